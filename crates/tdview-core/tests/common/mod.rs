#![allow(dead_code)]

use std::path::PathBuf;

use tdview_core::io::tdms::{
    DataType, NO_RAW_DATA, RAW_INDEX_SAME_AS_PREVIOUS, TDMS_TAG, TDMS_VERSION, TOC_BIG_ENDIAN,
};
use tdview_core::synth::{write_synthetic_dataset, SyntheticLayout};

/// Raw data index of a hand-built metadata entry.
pub enum Index {
    None,
    SameAsPrevious,
    Numeric(DataType, u64),
    Strings(u64, u64),
}

/// Builds the metadata block of a TDMS segment.
pub struct MetaBuilder {
    objects: Vec<u8>,
    count: u32,
    big_endian: bool,
}

impl MetaBuilder {
    pub fn new(big_endian: bool) -> Self {
        Self { objects: Vec::new(), count: 0, big_endian }
    }

    fn u32(&mut self, v: u32) {
        let bytes = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.objects.extend_from_slice(&bytes);
    }

    fn u64(&mut self, v: u64) {
        let bytes = if self.big_endian { v.to_be_bytes() } else { v.to_le_bytes() };
        self.objects.extend_from_slice(&bytes);
    }

    fn string(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.objects.extend_from_slice(s.as_bytes());
    }

    /// Add an object with one `i32` property per `(name, value)` pair.
    pub fn object(mut self, path: &str, index: Index, props: &[(&str, i32)]) -> Self {
        self.count += 1;
        self.string(path);
        match index {
            Index::None => self.u32(NO_RAW_DATA),
            Index::SameAsPrevious => self.u32(RAW_INDEX_SAME_AS_PREVIOUS),
            Index::Numeric(dt, count) => {
                self.u32(20);
                self.u32(dt.code());
                self.u32(1);
                self.u64(count);
            }
            Index::Strings(count, total) => {
                self.u32(28);
                self.u32(DataType::String.code());
                self.u32(1);
                self.u64(count);
                self.u64(total);
            }
        }
        self.u32(props.len() as u32);
        for (name, value) in props {
            self.string(name);
            self.u32(DataType::I32.code());
            let bytes = if self.big_endian { value.to_be_bytes() } else { value.to_le_bytes() };
            self.objects.extend_from_slice(&bytes);
        }
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let count = if self.big_endian { self.count.to_be_bytes() } else { self.count.to_le_bytes() };
        out.extend_from_slice(&count);
        out.extend_from_slice(&self.objects);
        out
    }
}

/// Lead-in + metadata + raw data.
pub fn segment(toc: u32, meta: &[u8], raw: &[u8]) -> Vec<u8> {
    let big_endian = toc & TOC_BIG_ENDIAN != 0;
    let next = (meta.len() + raw.len()) as u64;
    let raw_offset = meta.len() as u64;

    let mut buf = Vec::new();
    buf.extend_from_slice(TDMS_TAG);
    buf.extend_from_slice(&toc.to_le_bytes());
    if big_endian {
        buf.extend_from_slice(&TDMS_VERSION.to_be_bytes());
        buf.extend_from_slice(&next.to_be_bytes());
        buf.extend_from_slice(&raw_offset.to_be_bytes());
    } else {
        buf.extend_from_slice(&TDMS_VERSION.to_le_bytes());
        buf.extend_from_slice(&next.to_le_bytes());
        buf.extend_from_slice(&raw_offset.to_le_bytes());
    }
    buf.extend_from_slice(meta);
    buf.extend_from_slice(raw);
    buf
}

pub fn le_u16s(values: &[u16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

/// Write bytes to a temporary `.tdms` file.
///
/// The file stays alive as long as the returned `NamedTempFile` is not dropped.
pub fn write_temp_tdms(data: &[u8]) -> tempfile::NamedTempFile {
    use std::io::Write;
    let mut f = tempfile::Builder::new()
        .suffix(".tdms")
        .tempfile()
        .expect("create temp file");
    f.write_all(data).expect("write TDMS data");
    f.flush().expect("flush");
    f
}

/// Small synthetic recording on disk. Returns the temp dir and the XML path.
pub fn synthetic_dataset(time_steps: usize, z_stride: usize) -> (tempfile::TempDir, PathBuf, SyntheticLayout) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let layout = SyntheticLayout {
        name: "stack".into(),
        width: 6,
        height: 4,
        time_steps,
        z_stride,
        ..SyntheticLayout::default()
    };
    let xml = write_synthetic_dataset(dir.path(), &layout).expect("write dataset");
    (dir, xml, layout)
}
