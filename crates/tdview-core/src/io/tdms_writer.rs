use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TdviewError};
use crate::io::tdms::{
    ChannelData, DataType, ObjectPath, PropertyValue, TdmsTimestamp, NO_RAW_DATA, TDMS_TAG,
    TDMS_VERSION, TOC_META_DATA, TOC_NEW_OBJ_LIST, TOC_RAW_DATA,
};

/// Length of a numeric raw data index, including the length field itself.
const RAW_INDEX_LEN: u32 = 20;

/// One object (root, group or channel) written into a segment.
pub struct SegmentObject<'a> {
    pub path: ObjectPath,
    pub properties: &'a [(String, PropertyValue)],
    pub data: Option<&'a ChannelData>,
}

impl<'a> SegmentObject<'a> {
    pub fn root(properties: &'a [(String, PropertyValue)]) -> Self {
        Self { path: ObjectPath::Root, properties, data: None }
    }

    pub fn group(name: &str, properties: &'a [(String, PropertyValue)]) -> Self {
        Self { path: ObjectPath::Group(name.to_string()), properties, data: None }
    }

    pub fn channel(group: &str, name: &str, data: &'a ChannelData) -> Self {
        Self {
            path: ObjectPath::Channel(group.to_string(), name.to_string()),
            properties: &[],
            data: Some(data),
        }
    }
}

/// Writes little-endian TDMS files, one self-describing segment per call.
pub struct TdmsWriter {
    writer: BufWriter<File>,
    segments_written: usize,
}

impl TdmsWriter {
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            segments_written: 0,
        })
    }

    /// Write a segment that declares a fresh object list with contiguous data.
    pub fn write_segment(&mut self, objects: &[SegmentObject<'_>]) -> Result<()> {
        let mut meta = Vec::new();
        put_u32(&mut meta, to_u32(objects.len(), "object count")?);
        let mut raw = Vec::new();

        for object in objects {
            put_string(&mut meta, &object.path.to_string())?;
            match object.data {
                Some(data) => {
                    if matches!(object.path, ObjectPath::Root | ObjectPath::Group(_)) {
                        return Err(TdviewError::InvalidTdms(format!(
                            "{} cannot carry raw data",
                            object.path
                        )));
                    }
                    put_u32(&mut meta, RAW_INDEX_LEN);
                    put_u32(&mut meta, data.data_type().code());
                    put_u32(&mut meta, 1);
                    put_u64(&mut meta, data.len() as u64);
                    encode_data(&mut raw, data);
                }
                None => put_u32(&mut meta, NO_RAW_DATA),
            }
            put_u32(&mut meta, to_u32(object.properties.len(), "property count")?);
            for (name, value) in object.properties {
                put_string(&mut meta, name)?;
                put_property(&mut meta, value)?;
            }
        }

        let mut toc = TOC_META_DATA | TOC_NEW_OBJ_LIST;
        if !raw.is_empty() {
            toc |= TOC_RAW_DATA;
        }

        self.writer.write_all(TDMS_TAG)?;
        self.writer.write_all(&toc.to_le_bytes())?;
        self.writer.write_all(&TDMS_VERSION.to_le_bytes())?;
        self.writer.write_all(&((meta.len() + raw.len()) as u64).to_le_bytes())?;
        self.writer.write_all(&(meta.len() as u64).to_le_bytes())?;
        self.writer.write_all(&meta)?;
        self.writer.write_all(&raw)?;
        self.segments_written += 1;
        Ok(())
    }

    pub fn segments_written(&self) -> usize {
        self.segments_written
    }

    /// Flush and finalize the file.
    pub fn finalize(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_u64(buf: &mut Vec<u8>, v: u64) {
    buf.extend_from_slice(&v.to_le_bytes());
}

fn put_string(buf: &mut Vec<u8>, s: &str) -> Result<()> {
    put_u32(buf, to_u32(s.len(), "string length")?);
    buf.extend_from_slice(s.as_bytes());
    Ok(())
}

fn to_u32(n: usize, what: &str) -> Result<u32> {
    u32::try_from(n).map_err(|_| TdviewError::InvalidTdms(format!("{what} {n} exceeds u32")))
}

fn put_timestamp(buf: &mut Vec<u8>, ts: &TdmsTimestamp) {
    buf.extend_from_slice(&ts.fraction.to_le_bytes());
    buf.extend_from_slice(&ts.seconds.to_le_bytes());
}

fn put_property(buf: &mut Vec<u8>, value: &PropertyValue) -> Result<()> {
    match value {
        PropertyValue::Int(v) => {
            put_u32(buf, DataType::I64.code());
            buf.extend_from_slice(&v.to_le_bytes());
        }
        PropertyValue::UInt(v) => {
            put_u32(buf, DataType::U64.code());
            buf.extend_from_slice(&v.to_le_bytes());
        }
        PropertyValue::Float(v) => {
            put_u32(buf, DataType::F64.code());
            buf.extend_from_slice(&v.to_le_bytes());
        }
        PropertyValue::String(s) => {
            put_u32(buf, DataType::String.code());
            put_string(buf, s)?;
        }
        PropertyValue::Bool(b) => {
            put_u32(buf, DataType::Bool.code());
            buf.push(u8::from(*b));
        }
        PropertyValue::Timestamp(ts) => {
            put_u32(buf, DataType::Timestamp.code());
            put_timestamp(buf, ts);
        }
    }
    Ok(())
}

fn encode_data(buf: &mut Vec<u8>, data: &ChannelData) {
    match data {
        ChannelData::I8(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::I16(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::I32(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::I64(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::U8(v) => buf.extend_from_slice(v),
        ChannelData::U16(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::U32(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::U64(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::F32(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::F64(v) => v.iter().for_each(|x| buf.extend_from_slice(&x.to_le_bytes())),
        ChannelData::Bool(v) => buf.extend(v.iter().map(|&b| u8::from(b))),
        ChannelData::Timestamp(v) => v.iter().for_each(|ts| put_timestamp(buf, ts)),
    }
}
