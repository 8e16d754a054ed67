mod logger;
mod record;
mod session;

pub use logger::SessionLogger;
pub use session::LoggingSession;

#[cfg(test)]
mod tests {
    use super::record::HEADER;
    use super::*;
    use crate::fix::{Coordinate, FixSample, Smoothed, Timestamp};
    use crate::storage::memory::MemoryStorage;
    use crate::storage::{DirectoryStorage, StorageError};

    fn timestamp(second: u8) -> Timestamp {
        Timestamp {
            year: 2024,
            month: 5,
            day: 17,
            hour: 9,
            minute: 30,
            second,
            millisecond: 0,
            date_valid: true,
            time_valid: true,
        }
    }

    fn sample(second: u8) -> FixSample {
        FixSample {
            satellites: 9,
            latitude: Coordinate(356_812_360),
            longitude: Coordinate(1_397_671_250),
            altitude_m: 40.27,
            speed_kmh: 3.6,
            hdop: 0.87,
            pdop: 1.4,
            fix_ok: true,
            timestamp: timestamp(second),
            ..Default::default()
        }
    }

    fn smoothed() -> Smoothed {
        Smoothed {
            latitude: 35.68124,
            longitude: 139.76713,
            speed_kmh: 3.52,
        }
    }

    fn session() -> LoggingSession {
        LoggingSession::establish(&timestamp(5), "gnss_csv_data").unwrap()
    }

    #[test]
    fn file_names_from_session_timestamp() {
        let session = session();
        assert_eq!(session.filtered_name(), "gnss_csv_data_20240517_093005.csv");
        assert_eq!(session.raw_name(), "gnss_csv_data_20240517_093005_raw.csv");
        assert_eq!(session.id().second, 5);
    }

    #[test]
    fn no_session_without_valid_time() {
        let mut ts = timestamp(5);
        ts.time_valid = false;
        assert!(LoggingSession::establish(&ts, "log").is_none());
    }

    #[test]
    fn headers_written_once_at_start() {
        let logger = SessionLogger::start(session(), MemoryStorage::default());
        let storage = logger.storage();
        assert_eq!(storage.lines(session().raw_name()), vec![HEADER]);
        assert_eq!(storage.lines(session().filtered_name()), vec![HEADER]);
    }

    #[test]
    fn row_format() {
        let mut logger = SessionLogger::start(session(), MemoryStorage::default());
        let report = logger.on_second_rollover(&sample(6), &smoothed(), true);
        assert!(report.is_ok());

        let storage = logger.storage();
        assert_eq!(
            storage.lines(session().raw_name())[1],
            "2024/05/17,09:30:06,35.6812360,139.7671250,40.3,3.6,9,0.87"
        );
        assert_eq!(
            storage.lines(session().filtered_name())[1],
            "2024/05/17,09:30:06,35.6812400,139.7671300,40.3,3.5,9,0.87"
        );
    }

    #[test]
    fn untrusted_seconds_leave_gaps_in_filtered_stream() {
        let mut logger = SessionLogger::start(session(), MemoryStorage::default());
        let verdicts = [true, false, false, true, true, false];
        for (i, trusted) in verdicts.iter().enumerate() {
            let report = logger.on_second_rollover(&sample(10 + i as u8), &smoothed(), *trusted);
            assert!(report.raw.is_ok());
            assert_eq!(report.filtered.is_some(), *trusted);
        }

        let storage = logger.storage();
        let raw = storage.lines(session().raw_name());
        let filtered = storage.lines(session().filtered_name());
        assert_eq!(raw.len(), 1 + verdicts.len());
        assert_eq!(filtered.len(), 1 + 3);
        assert!(filtered[1].contains("09:30:10"));
        assert!(filtered[2].contains("09:30:13"));
        assert!(filtered[3].contains("09:30:14"));
        assert_eq!(logger.rows_raw(), 6);
        assert_eq!(logger.rows_filtered(), 3);
    }

    #[test]
    fn failing_stream_does_not_block_the_other() {
        let storage = MemoryStorage::default();
        storage.fail_on(session().filtered_name());
        let mut logger = SessionLogger::start(session(), storage);

        let report = logger.on_second_rollover(&sample(6), &smoothed(), true);
        assert!(report.raw.is_ok());
        assert!(matches!(report.filtered, Some(Err(StorageError::Io(_)))));
        assert!(!report.is_ok());
        assert_eq!(logger.storage().lines(session().raw_name()).len(), 2);
    }

    #[test]
    fn unplugged_storage_reports_failure_and_recovers_with_header() {
        let storage = MemoryStorage::default();
        storage.unplugged.set(true);
        let mut logger = SessionLogger::start(session(), storage);
        assert!(!logger.is_ready());

        let report = logger.on_second_rollover(&sample(6), &smoothed(), true);
        assert!(matches!(report.raw, Err(StorageError::NotReady)));
        assert!(matches!(report.filtered, Some(Err(StorageError::NotReady))));

        logger.storage().unplugged.set(false);
        logger.on_second_rollover(&sample(7), &smoothed(), false);
        let raw = logger.storage().lines(session().raw_name());
        assert_eq!(raw[0], HEADER);
        assert!(raw[1].contains("09:30:07"));
        assert!(logger.storage().lines(session().filtered_name()).is_empty());
    }

    #[test]
    fn writes_csv_files_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = DirectoryStorage::new(dir.path().to_path_buf());
        let mut logger = SessionLogger::start(session(), storage);
        logger.on_second_rollover(&sample(6), &smoothed(), false);
        logger.on_second_rollover(&sample(7), &smoothed(), true);

        let raw = std::fs::read_to_string(dir.path().join(session().raw_name())).unwrap();
        let filtered =
            std::fs::read_to_string(dir.path().join(session().filtered_name())).unwrap();
        assert_eq!(raw.lines().count(), 3);
        assert_eq!(filtered.lines().count(), 2);
        assert_eq!(filtered.lines().next(), Some(HEADER));
    }
}
