// Sanity check of the preload library.  The dynamic loader silently ignores
// an LD_PRELOAD entry it can not load (it only prints an error), so report the
// obvious mismatches before handing over to the target.

use object::{BinaryFormat, Object, ObjectKind};
use std::fs;
use std::path::Path;

#[derive(Debug, PartialEq)]
pub struct LibraryInfo {
    pub kind: ObjectKind,
    pub is_64: bool,
    pub architecture: object::Architecture,
}

impl LibraryInfo {
    pub fn is_shared_object(&self) -> bool {
        self.kind == ObjectKind::Dynamic
    }

    // The loader only accepts objects of the same ELF class as the process.
    pub fn matches_host(&self) -> bool {
        self.is_64 == cfg!(target_pointer_width = "64")
    }
}

pub fn inspect<P: AsRef<Path>>(filename: &P) -> Result<LibraryInfo, &'static str> {
    let file = match fs::File::open(&filename) {
        Ok(file) => file,
        Err(_) => return Err("Failed to open file"),
    };

    let mmap = match unsafe { memmap2::Mmap::map(&file) } {
        Ok(mmap) => mmap,
        Err(_) => return Err("Failed to map file"),
    };

    let obj = match object::File::parse(&*mmap) {
        Ok(obj) => obj,
        Err(_) => return Err("Failed to parse file"),
    };

    if obj.format() != BinaryFormat::Elf {
        return Err("Not an ELF object");
    }

    Ok(LibraryInfo {
        kind: obj.kind(),
        is_64: obj.is_64(),
        architecture: obj.architecture(),
    })
}

// Returns a description of what is wrong with the library, if anything.
pub fn check_library<P: AsRef<Path>>(filename: &P) -> Option<String> {
    match inspect(filename) {
        Err(e) => Some(format!("{}: {}", filename.as_ref().display(), e)),
        Ok(info) if !info.is_shared_object() => Some(format!(
            "{} is not a shared object",
            filename.as_ref().display()
        )),
        Ok(info) if !info.matches_host() => Some(format!(
            "{} is a {}-bit object ({:?}), it will not be loaded",
            filename.as_ref().display(),
            if info.is_64 { 64 } else { 32 },
            info.architecture
        )),
        Ok(_) => None,
    }
}
