use std::fs::File;

/// Reads exactly one byte at `pos`.
#[inline]
pub fn read_byte_at(file: &File, pos: u64) -> std::io::Result<u8> {
    let mut buf = [0u8; 1];
    file_read_at_exact(file, pos, &mut buf)?;
    Ok(buf[0])
}

/// Writes one byte at `pos`.
#[inline]
pub fn write_byte_at(file: &File, pos: u64, value: u8) -> std::io::Result<()> {
    file_write_at(file, pos, &[value])
}

/// Makes sure `file` is at least `min_len` bytes long.
///
/// A shorter file is extended to exactly `min_len` bytes; the appended bytes
/// read as zero and the existing content is left untouched. A file that is
/// already long enough is not modified.
///
/// Returns the resulting file length.
pub fn ensure_len(file: &File, min_len: u64) -> std::io::Result<u64> {
    let current = file.metadata()?.len();
    if current >= min_len {
        return Ok(current);
    }
    log::debug!("growing backing file from {current} to {min_len} bytes");
    file.set_len(min_len)?;
    Ok(min_len)
}

#[cfg(unix)]
pub fn file_read_at_exact(file: &File, pos: u64, buf: &mut [u8]) -> std::io::Result<()> {
    use std::os::unix::fs::FileExt;

    file.read_exact_at(buf, pos)?;
    Ok(())
}

#[cfg(unix)]
pub fn file_write_at(file: &File, pos: u64, buf: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::FileExt;

    file.write_all_at(buf, pos)
}

#[cfg(windows)]
pub fn file_read_at_exact(file: &File, mut pos: u64, mut buf: &mut [u8]) -> std::io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !buf.is_empty() {
        match file.seek_read(buf, pos) {
            Ok(0) => break,
            Ok(n) => {
                buf = &mut buf[n..];
                pos += n as u64;
            }
            Err(e) => return Err(e),
        }
    }
    if !buf.is_empty() {
        return Err(std::io::ErrorKind::UnexpectedEof.into());
    }
    Ok(())
}

#[cfg(windows)]
pub fn file_write_at(file: &File, mut pos: u64, mut buf: &[u8]) -> std::io::Result<()> {
    use std::os::windows::fs::FileExt;

    while !buf.is_empty() {
        match file.seek_write(buf, pos) {
            Ok(0) => return Err(std::io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                buf = &buf[n..];
                pos += n as u64;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}
