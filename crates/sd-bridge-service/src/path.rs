use embedded_sdmmc::ShortFileName;

/// The path does not name anything a FAT volume can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct InvalidPath;

/// A request path split into parent directories and a leaf.
///
/// Every component is a valid 8.3 name. `/` (or an empty path) is the root
/// directory and has an empty leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilePath<'a> {
    parents: &'a str,
    leaf: &'a str,
}

impl<'a> FilePath<'a> {
    pub fn parse(path: &'a str) -> Result<Self, InvalidPath> {
        let path = path.trim_matches('/');
        if path.is_empty() {
            return Ok(Self { parents: "", leaf: "" });
        }

        for name in path.split('/') {
            if name.is_empty() || name == "." || name == ".." {
                return Err(InvalidPath);
            }
            ShortFileName::create_from_str(name).map_err(|_| InvalidPath)?;
        }

        let (parents, leaf) = path.rsplit_once('/').unwrap_or(("", path));
        Ok(Self { parents, leaf })
    }

    pub fn is_root(&self) -> bool {
        self.leaf.is_empty()
    }

    /// Directories to walk from the root, outermost first.
    pub fn parents(&self) -> impl Iterator<Item = &'a str> {
        self.parents.split('/').filter(|s| !s.is_empty())
    }

    pub fn leaf(&self) -> &'a str {
        self.leaf
    }
}
