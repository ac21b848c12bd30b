//! Filesystem helpers built on `cap-std` and `camino`.

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8};
use std::io;
use std::path::Component;

/// Open a UTF-8 file path using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Create the parent directory of a database path when it is missing.
pub(crate) fn ensure_parent_dir(path: &Utf8Path) -> io::Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_str().is_empty() || parent == Utf8Path::new("/") {
        return Ok(());
    }

    let (base_dir, relative) = base_dir_and_relative(parent)?;
    if relative.as_str().is_empty() {
        return Ok(());
    }
    base_dir.create_dir_all(&relative)
}

/// Split `parent` into an ambient base directory and the relative remainder.
fn base_dir_and_relative(parent: &Utf8Path) -> io::Result<(fs_utf8::Dir, Utf8PathBuf)> {
    let (base, relative) = match parent.as_std_path().components().next() {
        Some(Component::Prefix(_) | Component::RootDir) => {
            let mut components = parent.components();
            let mut base = Utf8PathBuf::new();
            for component in components.by_ref() {
                base.push(component);
                if matches!(component, camino::Utf8Component::RootDir) {
                    break;
                }
            }
            (base, components.as_path().to_path_buf())
        }
        _ => (Utf8PathBuf::from("."), parent.to_path_buf()),
    };

    let dir = fs_utf8::Dir::open_ambient_dir(&base, ambient_authority())?;
    Ok((dir, relative))
}
