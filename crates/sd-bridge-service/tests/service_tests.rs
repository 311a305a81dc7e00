use core::cell::Cell;

use bus_arbiter::{StorageStatus, UnitOfWork};
use embedded_sdmmc::{
    Block, BlockCount, BlockDevice, BlockIdx, TimeSource, Timestamp,
    VolumeManager,
};
use sd_bridge_service::{
    FileOp, FilePath, FileRequest, InvalidPath, MountCheck, PendingRequest,
    ServiceError, ServiceStatus,
};

// ---------------------------------------------------------------------------
// Mock card
// ---------------------------------------------------------------------------

/// A card that answers every access with an error and counts reads.
struct DeadCard<'a> {
    reads: &'a Cell<usize>,
}

#[derive(Debug, PartialEq)]
struct CardGone;

impl BlockDevice for DeadCard<'_> {
    type Error = CardGone;

    fn read(
        &self,
        _blocks: &mut [Block],
        _start_block_idx: BlockIdx,
    ) -> Result<(), CardGone> {
        self.reads.set(self.reads.get() + 1);
        Err(CardGone)
    }

    fn write(
        &self,
        _blocks: &[Block],
        _start_block_idx: BlockIdx,
    ) -> Result<(), CardGone> {
        Err(CardGone)
    }

    fn num_blocks(&self) -> Result<BlockCount, CardGone> {
        Err(CardGone)
    }
}

struct Epoch;

impl TimeSource for Epoch {
    fn get_timestamp(&self) -> Timestamp {
        Timestamp {
            year_since_1970: 0,
            zero_indexed_month: 0,
            zero_indexed_day: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
        }
    }
}

type Error = ServiceError<CardGone>;

fn dead_volumes(reads: &Cell<usize>) -> VolumeManager<DeadCard<'_>, Epoch> {
    VolumeManager::new(DeadCard { reads }, Epoch)
}

fn stat(id: u32, path: &str) -> PendingRequest {
    PendingRequest::new(FileRequest {
        id,
        op: FileOp::Stat { path: path.try_into().unwrap() },
    })
}

fn read(id: u32, path: &str, offset: u32) -> PendingRequest {
    PendingRequest::new(FileRequest {
        id,
        op: FileOp::Read { path: path.try_into().unwrap(), offset },
    })
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

#[test]
fn root_has_empty_leaf() {
    for root in ["/", "", "//"] {
        let path = FilePath::parse(root).unwrap();
        assert!(path.is_root());
        assert_eq!(path.parents().count(), 0);
    }
}

#[test]
fn nested_path_splits_into_parents_and_leaf() {
    let path = FilePath::parse("/GCODE/PARTS/BRACKET.GCO").unwrap();

    assert!(!path.is_root());
    assert_eq!(path.leaf(), "BRACKET.GCO");
    let parents: Vec<&str> = path.parents().collect();
    assert_eq!(parents, ["GCODE", "PARTS"]);
}

#[test]
fn trailing_slash_is_ignored() {
    let path = FilePath::parse("/GCODE/").unwrap();
    assert_eq!(path.leaf(), "GCODE");
    assert_eq!(path.parents().count(), 0);
}

#[test]
fn non_short_names_are_rejected() {
    for bad in [
        "LONGFILENAME.TXT",
        "GCODE/LONGDIRECTORY/A.GCO",
        "A.TOOLONG",
        "GCODE//A.GCO",
        "../SECRET.TXT",
        "GCODE/./A.GCO",
    ] {
        assert_eq!(FilePath::parse(bad), Err(InvalidPath), "{bad}");
    }
}

// ---------------------------------------------------------------------------
// Status translation
// ---------------------------------------------------------------------------

#[test]
fn refusals_map_to_distinct_classes() {
    let failed = ServiceStatus::from(StorageStatus::StorageFailed);
    assert_eq!(failed.code, "500 Internal Server Error");
    assert_eq!(failed.message, "Failed to initialize SD Card");

    let busy = ServiceStatus::from(StorageStatus::StorageBusy);
    assert_eq!(busy.code, "503 Service Unavailable");
    assert_eq!(busy.message, "Printer is reading from SD card");
}

#[test]
fn missing_or_malformed_entries_are_not_found() {
    use embedded_sdmmc::{Error as SdError, FilenameError};

    for e in [
        Error::InvalidPath,
        Error::Storage(SdError::NotFound),
        Error::Storage(SdError::FilenameError(FilenameError::NameTooLong)),
        Error::Storage(SdError::OpenedFileAsDir),
    ] {
        assert_eq!(e.status(), ServiceStatus::NOT_FOUND);
    }
}

#[test]
fn reading_a_directory_is_a_bad_request() {
    let e = Error::Storage(embedded_sdmmc::Error::OpenedDirAsFile);
    assert_eq!(e.status(), ServiceStatus::IS_DIRECTORY);
}

#[test]
fn card_faults_are_server_errors() {
    let e = Error::Storage(embedded_sdmmc::Error::DeviceError(CardGone));
    assert_eq!(e.status(), ServiceStatus::CARD_ERROR);
}

// ---------------------------------------------------------------------------
// Replies
// ---------------------------------------------------------------------------

#[test]
fn rejected_request_carries_gate_status() {
    let mut pending = stat(7, "/");
    UnitOfWork::<VolumeManager<DeadCard<'_>, Epoch>>::reject(
        &mut pending,
        StorageStatus::StorageBusy,
    );

    let reply = pending.into_reply::<CardGone>(None);
    assert_eq!(reply.id, 7);
    assert_eq!(reply.result, Err(StorageStatus::StorageBusy.into()));
}

#[test]
fn unanswered_request_is_a_server_error() {
    let reply = stat(1, "/").into_reply::<CardGone>(None);
    assert_eq!(reply.result, Err(StorageStatus::StorageFailed.into()));
}

#[test]
fn failure_overrides_reply() {
    let reply = stat(2, "/").into_reply(Some(Error::InvalidPath));
    assert_eq!(reply.result, Err(ServiceStatus::NOT_FOUND));
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

#[futures_test::test]
async fn bad_path_fails_before_touching_card() {
    let reads = Cell::new(0);
    let mut volumes = dead_volumes(&reads);
    let mut pending = read(3, "/GCODE/NOT A SHORT NAME.GCO", 0);

    let failure = pending.execute(&mut volumes).await.err();
    assert!(matches!(failure, Some(ServiceError::InvalidPath)));
    assert_eq!(reads.get(), 0);

    let reply = pending.into_reply(failure);
    assert_eq!(reply.result, Err(ServiceStatus::NOT_FOUND));
}

#[futures_test::test]
async fn reading_root_is_a_bad_request() {
    let reads = Cell::new(0);
    let mut volumes = dead_volumes(&reads);
    let mut pending = read(4, "/", 0);

    let failure = pending.execute(&mut volumes).await.err();
    assert_eq!(reads.get(), 0);
    let reply = pending.into_reply(failure);
    assert_eq!(reply.result, Err(ServiceStatus::IS_DIRECTORY));
}

#[futures_test::test]
async fn root_stat_reaches_the_card() {
    let reads = Cell::new(0);
    let mut volumes = dead_volumes(&reads);
    let mut pending = stat(5, "/");

    let failure = pending.execute(&mut volumes).await.err();
    assert!(matches!(failure, Some(ServiceError::Storage(_))));
    let reply = pending.into_reply(failure);
    assert_eq!(reply.result, Err(ServiceStatus::CARD_ERROR));
}

#[futures_test::test]
async fn mount_fails_on_dead_card() {
    let reads = Cell::new(0);
    let mut volumes = dead_volumes(&reads);

    let result = MountCheck.execute(&mut volumes).await;
    assert!(matches!(result, Err(ServiceError::Storage(_))));
}
