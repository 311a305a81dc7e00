use core::fmt::Write;

use bus_arbiter::{StorageStatus, UnitOfWork};
use embedded_sdmmc::{
    BlockDevice, Mode, TimeSource, VolumeIdx, VolumeManager,
};
use heapless::{String, Vec};

use crate::path::FilePath;
use crate::status::{ServiceError, ServiceStatus};

pub const MAX_PATH_LEN: usize = 64;
pub const CHUNK_LEN: usize = 512;
/// 8.3 name plus the dot.
pub const MAX_NAME_LEN: usize = 12;

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileOp {
    /// Name, size and kind of one directory entry, or of the root.
    Stat { path: String<MAX_PATH_LEN> },
    /// Up to [`CHUNK_LEN`] bytes of a file starting at `offset`.
    Read { path: String<MAX_PATH_LEN>, offset: u32 },
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileRequest {
    pub id: u32,
    pub op: FileOp,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EntryInfo {
    pub name: String<MAX_NAME_LEN>,
    pub size: u32,
    pub is_dir: bool,
}

#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FileBody {
    Entry(EntryInfo),
    Chunk { offset: u32, total: u32, data: Vec<u8, CHUNK_LEN> },
}

#[derive(Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FileReply {
    pub id: u32,
    pub result: Result<FileBody, ServiceStatus>,
}

type Volumes<D, T, const DIRS: usize, const FILES: usize, const VOLS: usize> =
    VolumeManager<D, T, DIRS, FILES, VOLS>;

fn stat<D, T, const DIRS: usize, const FILES: usize, const VOLS: usize>(
    volumes: &Volumes<D, T, DIRS, FILES, VOLS>,
    path: &str,
) -> Result<FileBody, ServiceError<D::Error>>
where
    D: BlockDevice,
    T: TimeSource,
{
    let path = FilePath::parse(path)?;
    let volume = volumes.open_volume(VolumeIdx(0))?;
    let mut dir = volume.open_root_dir()?;

    if path.is_root() {
        let mut name = String::new();
        let _ = name.push('/');
        return Ok(FileBody::Entry(EntryInfo { name, size: 0, is_dir: true }));
    }

    for name in path.parents() {
        let raw = dir.open_dir(name)?.to_raw_directory();
        dir = raw.to_directory(volumes);
    }
    let entry = dir.find_directory_entry(path.leaf())?;
    let mut name = String::new();
    // A short file name always fits.
    let _ = write!(name, "{}", entry.name);
    Ok(FileBody::Entry(EntryInfo {
        name,
        size: entry.size,
        is_dir: entry.attributes.is_directory(),
    }))
}

fn read_chunk<D, T, const DIRS: usize, const FILES: usize, const VOLS: usize>(
    volumes: &Volumes<D, T, DIRS, FILES, VOLS>,
    path: &str,
    offset: u32,
) -> Result<FileBody, ServiceError<D::Error>>
where
    D: BlockDevice,
    T: TimeSource,
{
    let path = FilePath::parse(path)?;
    if path.is_root() {
        return Err(ServiceError::Storage(
            embedded_sdmmc::Error::OpenedDirAsFile,
        ));
    }
    let volume = volumes.open_volume(VolumeIdx(0))?;
    let mut dir = volume.open_root_dir()?;
    for name in path.parents() {
        let raw = dir.open_dir(name)?.to_raw_directory();
        dir = raw.to_directory(volumes);
    }

    let file = dir.open_file_in_dir(path.leaf(), Mode::ReadOnly)?;
    let total = file.length();
    let mut data = Vec::new();
    if offset < total {
        file.seek_from_start(offset)?;
        let mut buf = [0u8; CHUNK_LEN];
        let n = file.read(&mut buf)?;
        // n <= CHUNK_LEN
        let _ = data.extend_from_slice(&buf[..n]);
    }
    Ok(FileBody::Chunk { offset, total, data })
}

/// A request on its way through the gate.
pub struct PendingRequest {
    request: FileRequest,
    reply: Option<Result<FileBody, ServiceStatus>>,
}

impl PendingRequest {
    pub fn new(request: FileRequest) -> Self {
        Self { request, reply: None }
    }

    pub fn id(&self) -> u32 {
        self.request.id
    }

    /// The reply for the transport. `failure` is the error returned by
    /// [`execute`](UnitOfWork::execute), if any.
    pub fn into_reply<E: core::fmt::Debug>(
        self,
        failure: Option<ServiceError<E>>,
    ) -> FileReply {
        let result = match (self.reply, failure) {
            (_, Some(e)) => Err(e.status()),
            (Some(result), None) => result,
            (None, None) => Err(StorageStatus::StorageFailed.into()),
        };
        FileReply { id: self.request.id, result }
    }
}

impl<D, T, const DIRS: usize, const FILES: usize, const VOLS: usize>
    UnitOfWork<Volumes<D, T, DIRS, FILES, VOLS>> for PendingRequest
where
    D: BlockDevice,
    T: TimeSource,
{
    type Error = ServiceError<D::Error>;

    async fn execute(
        &mut self,
        volumes: &mut Volumes<D, T, DIRS, FILES, VOLS>,
    ) -> Result<(), Self::Error> {
        let body = match &self.request.op {
            FileOp::Stat { path } => stat(volumes, path)?,
            FileOp::Read { path, offset } => {
                read_chunk(volumes, path, *offset)?
            }
        };
        self.reply = Some(Ok(body));
        Ok(())
    }

    fn reject(&mut self, status: StorageStatus) {
        self.reply = Some(Err(status.into()));
    }
}

/// Startup check: the medium is ready once volume 0 opens.
pub struct MountCheck;

impl<D, T, const DIRS: usize, const FILES: usize, const VOLS: usize>
    UnitOfWork<Volumes<D, T, DIRS, FILES, VOLS>> for MountCheck
where
    D: BlockDevice,
    T: TimeSource,
{
    type Error = ServiceError<D::Error>;

    async fn execute(
        &mut self,
        volumes: &mut Volumes<D, T, DIRS, FILES, VOLS>,
    ) -> Result<(), Self::Error> {
        let volume = volumes.open_volume(VolumeIdx(0))?;
        drop(volume);
        Ok(())
    }

    fn reject(&mut self, _status: StorageStatus) {}
}
