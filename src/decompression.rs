use anyhow::{anyhow, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::Path;

/// Open the input batch file with transparent decompression.
///
/// Compression is detected from magic bytes, not the file extension:
/// gzip (1F 8B 08) and zstd (28 B5 2F FD) are supported, anything else is
/// read as-is. ZIP archives are rejected up front since they cannot be
/// streamed. The handle stays on the driver thread; only parsed records
/// cross into the pipeline.
pub fn open_input<P: AsRef<Path>>(path: P) -> Result<Box<dyn BufRead>> {
    let path = path.as_ref();

    if let Some(extension) = path.extension().and_then(|ext| ext.to_str()) {
        if extension.eq_ignore_ascii_case("zip") {
            return Err(anyhow!(
                "ZIP input is not supported. Only gzip and zstd files can be streamed. Extract the archive first: unzip {}",
                path.display()
            ));
        }
    }

    let mut file = File::open(path)?;

    let mut head = [0u8; 4];
    let n = file.read(&mut head)?;

    // Put the sniffed bytes back in front using a cursor chain
    let chained = Cursor::new(head[..n].to_vec()).chain(file);

    let is_gzip = n >= 3 && head[..3] == [0x1F, 0x8B, 0x08];
    let is_zstd = n >= 4 && head == [0x28, 0xB5, 0x2F, 0xFD];

    if is_gzip {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(chained))))
    } else if is_zstd {
        Ok(Box::new(BufReader::new(zstd::Decoder::new(chained)?)))
    } else {
        Ok(Box::new(BufReader::new(chained)))
    }
}
