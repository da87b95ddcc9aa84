use std::collections::HashMap;
use std::fmt;
use std::fs::File;
use std::io::Cursor;
use std::path::Path;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};
use memmap2::Mmap;
use num_traits::AsPrimitive;

use crate::error::{Result, TdviewError};

pub const LEAD_IN_SIZE: usize = 28;
pub const TDMS_TAG: &[u8; 4] = b"TDSm";
pub const TDMS_VERSION: u32 = 4713;

pub const TOC_META_DATA: u32 = 1 << 1;
pub const TOC_NEW_OBJ_LIST: u32 = 1 << 2;
pub const TOC_RAW_DATA: u32 = 1 << 3;
pub const TOC_INTERLEAVED_DATA: u32 = 1 << 5;
pub const TOC_BIG_ENDIAN: u32 = 1 << 6;
pub const TOC_DAQMX_RAW_DATA: u32 = 1 << 7;

/// Raw data index marker: object carries no data in this segment.
pub const NO_RAW_DATA: u32 = 0xFFFF_FFFF;
/// Raw data index marker: reuse the object's index from an earlier segment.
pub const RAW_INDEX_SAME_AS_PREVIOUS: u32 = 0;
/// `next_segment_offset` of a segment whose writer never finished it.
const INCOMPLETE_SEGMENT: u64 = u64::MAX;

/// Seconds between the LabVIEW epoch (1904-01-01) and the Unix epoch.
const LABVIEW_EPOCH_OFFSET: i64 = 2_082_844_800;

/// TDMS element data types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Void,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
    F32,
    F64,
    String,
    Bool,
    Timestamp,
}

impl DataType {
    pub fn from_code(code: u32) -> Result<Self> {
        Ok(match code {
            0x00 => Self::Void,
            0x01 => Self::I8,
            0x02 => Self::I16,
            0x03 => Self::I32,
            0x04 => Self::I64,
            0x05 => Self::U8,
            0x06 => Self::U16,
            0x07 => Self::U32,
            0x08 => Self::U64,
            // Floats with unit share the plain float layout.
            0x09 | 0x19 => Self::F32,
            0x0A | 0x1A => Self::F64,
            0x20 => Self::String,
            0x21 => Self::Bool,
            0x44 => Self::Timestamp,
            other => return Err(TdviewError::UnsupportedDataType(other)),
        })
    }

    pub fn code(self) -> u32 {
        match self {
            Self::Void => 0x00,
            Self::I8 => 0x01,
            Self::I16 => 0x02,
            Self::I32 => 0x03,
            Self::I64 => 0x04,
            Self::U8 => 0x05,
            Self::U16 => 0x06,
            Self::U32 => 0x07,
            Self::U64 => 0x08,
            Self::F32 => 0x09,
            Self::F64 => 0x0A,
            Self::String => 0x20,
            Self::Bool => 0x21,
            Self::Timestamp => 0x44,
        }
    }

    /// Size in bytes of one value, `None` for variable-length types.
    pub fn size(self) -> Option<usize> {
        match self {
            Self::I8 | Self::U8 | Self::Bool => Some(1),
            Self::I16 | Self::U16 => Some(2),
            Self::I32 | Self::U32 | Self::F32 => Some(4),
            Self::I64 | Self::U64 | Self::F64 => Some(8),
            Self::Timestamp => Some(16),
            Self::Void | Self::String => None,
        }
    }
}

/// LabVIEW timestamp: whole seconds since 1904-01-01 UTC plus 2^-64 fractions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TdmsTimestamp {
    pub seconds: i64,
    pub fraction: u64,
}

impl TdmsTimestamp {
    pub fn to_unix_seconds(&self) -> f64 {
        (self.seconds - LABVIEW_EPOCH_OFFSET) as f64 + self.fraction as f64 / 2f64.powi(64)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum PropertyValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Bool(bool),
    Timestamp(TdmsTimestamp),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::UInt(v) => write!(f, "{v}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(v) => write!(f, "{v}"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Timestamp(ts) => write!(f, "{:.6} (unix)", ts.to_unix_seconds()),
        }
    }
}

pub type Properties = Vec<(String, PropertyValue)>;

/// Location of an object in the root / group / channel hierarchy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ObjectPath {
    Root,
    Group(String),
    Channel(String, String),
}

impl ObjectPath {
    /// Parse `/`, `/'group'` or `/'group'/'channel'` (quotes escaped as `''`).
    pub fn parse(path: &str) -> Result<Self> {
        let invalid = || TdviewError::InvalidTdms(format!("invalid object path: {path}"));
        let mut parts = Vec::new();
        let mut chars = path.chars().peekable();

        if path == "/" {
            return Ok(Self::Root);
        }
        while let Some(c) = chars.next() {
            if c != '/' || chars.next() != Some('\'') {
                return Err(invalid());
            }
            let mut name = String::new();
            loop {
                match chars.next() {
                    Some('\'') if chars.peek() == Some(&'\'') => {
                        chars.next();
                        name.push('\'');
                    }
                    Some('\'') => break,
                    Some(c) => name.push(c),
                    None => return Err(invalid()),
                }
            }
            parts.push(name);
        }

        let mut parts = parts.into_iter();
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), None, None) => Ok(Self::Group(group)),
            (Some(group), Some(channel), None) => Ok(Self::Channel(group, channel)),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for ObjectPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quote = |s: &str| format!("'{}'", s.replace('\'', "''"));
        match self {
            Self::Root => write!(f, "/"),
            Self::Group(g) => write!(f, "/{}", quote(g)),
            Self::Channel(g, c) => write!(f, "/{}/{}", quote(g), quote(c)),
        }
    }
}

/// Decoded channel values.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelData {
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
    Bool(Vec<bool>),
    Timestamp(Vec<TdmsTimestamp>),
}

macro_rules! channel_data_from {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(impl From<Vec<$t>> for ChannelData {
            fn from(values: Vec<$t>) -> Self {
                Self::$variant(values)
            }
        })*
    };
}

channel_data_from!(
    i8 => I8, i16 => I16, i32 => I32, i64 => I64,
    u8 => U8, u16 => U16, u32 => U32, u64 => U64,
    f32 => F32, f64 => F64, bool => Bool, TdmsTimestamp => Timestamp,
);

/// Apply `$body` to the numeric vector inside `$data`, binding it to `$v`.
macro_rules! with_numeric {
    ($data:expr, $v:ident => $body:expr, $otherwise:expr) => {
        match $data {
            ChannelData::I8($v) => $body,
            ChannelData::I16($v) => $body,
            ChannelData::I32($v) => $body,
            ChannelData::I64($v) => $body,
            ChannelData::U8($v) => $body,
            ChannelData::U16($v) => $body,
            ChannelData::U32($v) => $body,
            ChannelData::U64($v) => $body,
            ChannelData::F32($v) => $body,
            ChannelData::F64($v) => $body,
            _ => $otherwise,
        }
    };
}

impl ChannelData {
    pub fn len(&self) -> usize {
        match self {
            Self::Bool(v) => v.len(),
            Self::Timestamp(v) => v.len(),
            other => with_numeric!(other, v => v.len(), 0),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn data_type(&self) -> DataType {
        match self {
            Self::I8(_) => DataType::I8,
            Self::I16(_) => DataType::I16,
            Self::I32(_) => DataType::I32,
            Self::I64(_) => DataType::I64,
            Self::U8(_) => DataType::U8,
            Self::U16(_) => DataType::U16,
            Self::U32(_) => DataType::U32,
            Self::U64(_) => DataType::U64,
            Self::F32(_) => DataType::F32,
            Self::F64(_) => DataType::F64,
            Self::Bool(_) => DataType::Bool,
            Self::Timestamp(_) => DataType::Timestamp,
        }
    }

    /// Numeric cast to `u16` (integers wrap, floats truncate and saturate).
    pub fn to_u16(&self) -> Result<Vec<u16>> {
        match self {
            Self::U16(v) => Ok(v.clone()),
            Self::Bool(v) => Ok(v.iter().map(|&b| u16::from(b)).collect()),
            other => with_numeric!(other, v => Ok(cast_all(v)), Err(TdviewError::UnsupportedDataType(other.data_type().code()))),
        }
    }

    pub fn to_f64(&self) -> Result<Vec<f64>> {
        match self {
            Self::Bool(v) => Ok(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
            Self::Timestamp(v) => Ok(v.iter().map(TdmsTimestamp::to_unix_seconds).collect()),
            other => with_numeric!(other, v => Ok(cast_all(v)), Err(TdviewError::UnsupportedDataType(other.data_type().code()))),
        }
    }

    pub fn to_i64(&self) -> Result<Vec<i64>> {
        match self {
            Self::Bool(v) => Ok(v.iter().map(|&b| i64::from(b)).collect()),
            Self::Timestamp(_) => Err(TdviewError::UnsupportedDataType(DataType::Timestamp.code())),
            other => with_numeric!(other, v => Ok(cast_all(v)), Err(TdviewError::UnsupportedDataType(other.data_type().code()))),
        }
    }
}

fn cast_all<S, T>(values: &[S]) -> Vec<T>
where
    S: AsPrimitive<T>,
    T: Copy + 'static,
{
    values.iter().map(|v| v.as_()).collect()
}

/// A run of values of one channel inside a segment.
#[derive(Clone, Debug)]
struct DataChunk {
    offset: usize,
    count: usize,
    /// Bytes between consecutive values (type size unless interleaved).
    stride: usize,
    big_endian: bool,
}

/// Channel metadata plus the location of its raw data in the file.
#[derive(Clone, Debug)]
pub struct TdmsChannel {
    pub group: String,
    pub name: String,
    pub data_type: DataType,
    pub properties: Properties,
    chunks: Vec<DataChunk>,
}

impl TdmsChannel {
    fn new(group: &str, name: &str) -> Self {
        Self {
            group: group.to_string(),
            name: name.to_string(),
            data_type: DataType::Void,
            properties: Vec::new(),
            chunks: Vec::new(),
        }
    }

    /// Number of values across all segments.
    pub fn len(&self) -> usize {
        self.chunks.iter().map(|c| c.count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug)]
pub struct TdmsGroup {
    pub name: String,
    pub properties: Properties,
    channels: Vec<TdmsChannel>,
    by_name: HashMap<String, usize>,
}

impl TdmsGroup {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            properties: Vec::new(),
            channels: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn channels(&self) -> &[TdmsChannel] {
        &self.channels
    }

    pub fn channel(&self, name: &str) -> Option<&TdmsChannel> {
        self.by_name.get(name).map(|&i| &self.channels[i])
    }

    fn channel_mut(&mut self, name: &str) -> &mut TdmsChannel {
        let idx = match self.by_name.get(name) {
            Some(&i) => i,
            None => {
                self.channels.push(TdmsChannel::new(&self.name, name));
                self.by_name.insert(name.to_string(), self.channels.len() - 1);
                self.channels.len() - 1
            }
        };
        &mut self.channels[idx]
    }
}

/// Layout of one object's raw data within a segment chunk.
#[derive(Clone, Debug)]
struct RawIndex {
    data_type: DataType,
    count: usize,
    byte_size: usize,
}

#[derive(Clone, Debug)]
struct ActiveObject {
    path: ObjectPath,
    index: Option<RawIndex>,
}

/// Memory-mapped TDMS reader.
///
/// Opening only walks segment metadata; channel values are decoded from the
/// mapping on demand.
pub struct TdmsFile {
    mmap: Mmap,
    pub properties: Properties,
    groups: Vec<TdmsGroup>,
    by_name: HashMap<String, usize>,
    segment_count: usize,
}

impl TdmsFile {
    /// Open a TDMS file and index its segments.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file)? };

        let mut tdms = Self {
            mmap,
            properties: Vec::new(),
            groups: Vec::new(),
            by_name: HashMap::new(),
            segment_count: 0,
        };
        tdms.index_segments()?;

        tracing::debug!(
            path = %path.display(),
            segments = tdms.segment_count,
            groups = tdms.groups.len(),
            "Indexed TDMS file"
        );
        Ok(tdms)
    }

    pub fn groups(&self) -> &[TdmsGroup] {
        &self.groups
    }

    pub fn segment_count(&self) -> usize {
        self.segment_count
    }

    pub fn group(&self, name: &str) -> Result<&TdmsGroup> {
        self.by_name
            .get(name)
            .map(|&i| &self.groups[i])
            .ok_or_else(|| TdviewError::GroupNotFound(name.to_string()))
    }

    pub fn channel(&self, group: &str, name: &str) -> Result<&TdmsChannel> {
        self.group(group)?
            .channel(name)
            .ok_or_else(|| TdviewError::ChannelNotFound {
                group: group.to_string(),
                channel: name.to_string(),
            })
    }

    /// Decode all values of a channel.
    pub fn read_channel(&self, channel: &TdmsChannel) -> Result<ChannelData> {
        let chunks = &channel.chunks;
        Ok(match channel.data_type {
            DataType::I8 => ChannelData::I8(self.gather(chunks, 1, |b, _| b[0] as i8)?),
            DataType::U8 => ChannelData::U8(self.gather(chunks, 1, |b, _| b[0])?),
            DataType::Bool => ChannelData::Bool(self.gather(chunks, 1, |b, _| b[0] != 0)?),
            DataType::I16 => ChannelData::I16(self.gather(chunks, 2, pick(LittleEndian::read_i16, BigEndian::read_i16))?),
            DataType::U16 => ChannelData::U16(self.gather(chunks, 2, pick(LittleEndian::read_u16, BigEndian::read_u16))?),
            DataType::I32 => ChannelData::I32(self.gather(chunks, 4, pick(LittleEndian::read_i32, BigEndian::read_i32))?),
            DataType::U32 => ChannelData::U32(self.gather(chunks, 4, pick(LittleEndian::read_u32, BigEndian::read_u32))?),
            DataType::F32 => ChannelData::F32(self.gather(chunks, 4, pick(LittleEndian::read_f32, BigEndian::read_f32))?),
            DataType::I64 => ChannelData::I64(self.gather(chunks, 8, pick(LittleEndian::read_i64, BigEndian::read_i64))?),
            DataType::U64 => ChannelData::U64(self.gather(chunks, 8, pick(LittleEndian::read_u64, BigEndian::read_u64))?),
            DataType::F64 => ChannelData::F64(self.gather(chunks, 8, pick(LittleEndian::read_f64, BigEndian::read_f64))?),
            DataType::Timestamp => ChannelData::Timestamp(self.gather(chunks, 16, decode_timestamp)?),
            // Channels declared without raw data decode as empty.
            DataType::Void => ChannelData::F64(Vec::new()),
            DataType::String => {
                return Err(TdviewError::UnsupportedDataType(DataType::String.code()))
            }
        })
    }

    fn gather<T>(
        &self,
        chunks: &[DataChunk],
        size: usize,
        decode: impl Fn(&[u8], bool) -> T,
    ) -> Result<Vec<T>> {
        let total = chunks.iter().map(|c| c.count).sum();
        let mut out = Vec::with_capacity(total);
        for chunk in chunks {
            for i in 0..chunk.count {
                let start = chunk.offset + i * chunk.stride;
                let bytes = self.mmap.get(start..start + size).ok_or_else(|| {
                    TdviewError::InvalidTdms("raw data extends past end of file".into())
                })?;
                out.push(decode(bytes, chunk.big_endian));
            }
        }
        Ok(out)
    }

    fn index_segments(&mut self) -> Result<()> {
        let file_len = self.mmap.len();
        let mut pos = 0usize;
        let mut active: Vec<ActiveObject> = Vec::new();
        let mut last_index: HashMap<ObjectPath, RawIndex> = HashMap::new();

        while pos + LEAD_IN_SIZE <= file_len {
            let lead_in = &self.mmap[pos..pos + LEAD_IN_SIZE];
            if &lead_in[0..4] != TDMS_TAG {
                return Err(TdviewError::InvalidTdms(format!(
                    "missing TDSm tag at offset {pos}"
                )));
            }
            let toc = LittleEndian::read_u32(&lead_in[4..8]);
            let big_endian = toc & TOC_BIG_ENDIAN != 0;
            let (next_offset, raw_offset) = if big_endian {
                (BigEndian::read_u64(&lead_in[12..20]), BigEndian::read_u64(&lead_in[20..28]))
            } else {
                (LittleEndian::read_u64(&lead_in[12..20]), LittleEndian::read_u64(&lead_in[20..28]))
            };

            if toc & TOC_DAQMX_RAW_DATA != 0 {
                return Err(TdviewError::InvalidTdms(
                    "DAQmx raw data segments are not supported".into(),
                ));
            }

            let body = pos + LEAD_IN_SIZE;
            let segment_end = if next_offset == INCOMPLETE_SEGMENT {
                file_len
            } else {
                usize::try_from(next_offset)
                    .ok()
                    .and_then(|o| body.checked_add(o))
                    .filter(|&end| end <= file_len)
                    .unwrap_or(file_len)
            };
            let data_start = usize::try_from(raw_offset)
                .ok()
                .and_then(|o| body.checked_add(o))
                .filter(|&start| start <= segment_end)
                .ok_or_else(|| {
                    TdviewError::InvalidTdms(format!("raw data offset out of bounds at {pos}"))
                })?;

            if toc & TOC_META_DATA != 0 {
                if toc & TOC_NEW_OBJ_LIST != 0 {
                    active.clear();
                }
                let meta = &self.mmap[body..data_start];
                let objects = parse_metadata(meta, big_endian, &mut last_index)?;
                for (path, index, properties) in objects {
                    self.register_object(&path, properties);
                    match active.iter().position(|o| o.path == path) {
                        Some(i) => active[i].index = index,
                        None => active.push(ActiveObject { path, index }),
                    }
                }
            }

            if toc & TOC_RAW_DATA != 0 {
                let interleaved = toc & TOC_INTERLEAVED_DATA != 0;
                self.add_segment_chunks(&active, data_start, segment_end, interleaved, big_endian)?;
            }

            self.segment_count += 1;
            if next_offset == INCOMPLETE_SEGMENT {
                break;
            }
            pos = segment_end;
        }
        Ok(())
    }

    fn register_object(&mut self, path: &ObjectPath, properties: Properties) {
        match path {
            ObjectPath::Root => merge_properties(&mut self.properties, properties),
            ObjectPath::Group(g) => merge_properties(&mut self.group_mut(g).properties, properties),
            ObjectPath::Channel(g, c) => {
                let channel = self.group_mut(g).channel_mut(c);
                merge_properties(&mut channel.properties, properties);
            }
        }
    }

    fn group_mut(&mut self, name: &str) -> &mut TdmsGroup {
        let idx = match self.by_name.get(name) {
            Some(&i) => i,
            None => {
                self.groups.push(TdmsGroup::new(name));
                self.by_name.insert(name.to_string(), self.groups.len() - 1);
                self.groups.len() - 1
            }
        };
        &mut self.groups[idx]
    }

    fn add_segment_chunks(
        &mut self,
        active: &[ActiveObject],
        data_start: usize,
        segment_end: usize,
        interleaved: bool,
        big_endian: bool,
    ) -> Result<()> {
        let with_data: Vec<(&ObjectPath, &RawIndex)> = active
            .iter()
            .filter_map(|o| o.index.as_ref().map(|i| (&o.path, i)))
            .collect();
        let chunk_size: usize = with_data.iter().map(|(_, i)| i.byte_size).sum();
        if chunk_size == 0 {
            return Ok(());
        }

        if interleaved && with_data.iter().any(|(_, i)| i.data_type.size().is_none()) {
            return Err(TdviewError::InvalidTdms(
                "interleaved segment with variable-size data".into(),
            ));
        }
        let row_size: usize = with_data.iter().filter_map(|(_, i)| i.data_type.size()).sum();

        let data_len = segment_end - data_start;
        let chunk_count = data_len / chunk_size;
        for n in 0..chunk_count {
            let base = data_start + n * chunk_size;
            let mut offset = base;
            for (path, index) in &with_data {
                let value_size = index.data_type.size().unwrap_or(0);
                let stride = if interleaved { row_size } else { value_size };
                let chunk = DataChunk { offset, count: index.count, stride, big_endian };
                self.push_chunk(path, index.data_type, chunk);
                offset += if interleaved { value_size } else { index.byte_size };
            }
        }

        // A writer that stopped mid-chunk leaves a tail shorter than one chunk.
        let remainder = data_len % chunk_size;
        if remainder > 0 {
            tracing::warn!(
                remainder,
                chunk_size,
                "segment data is not a whole number of chunks, reading the partial chunk"
            );
            let base = data_start + chunk_count * chunk_size;
            self.add_partial_chunk(&with_data, base, remainder, interleaved, row_size, big_endian);
        }
        Ok(())
    }

    fn add_partial_chunk(
        &mut self,
        with_data: &[(&ObjectPath, &RawIndex)],
        base: usize,
        remainder: usize,
        interleaved: bool,
        row_size: usize,
        big_endian: bool,
    ) {
        if interleaved {
            let rows = remainder.checked_div(row_size).unwrap_or(0);
            let mut offset = base;
            for (path, index) in with_data {
                let value_size = index.data_type.size().unwrap_or(0);
                let count = rows.min(index.count);
                if count > 0 {
                    let chunk = DataChunk { offset, count, stride: row_size, big_endian };
                    self.push_chunk(path, index.data_type, chunk);
                }
                offset += value_size;
            }
            return;
        }

        let mut offset = base;
        let mut left = remainder;
        for (path, index) in with_data {
            // Variable-size values cannot be split without their offset table.
            let Some(value_size) = index.data_type.size().filter(|&s| s > 0) else {
                break;
            };
            let count = (left / value_size).min(index.count);
            if count == 0 {
                break;
            }
            let chunk = DataChunk { offset, count, stride: value_size, big_endian };
            self.push_chunk(path, index.data_type, chunk);
            if count < index.count {
                break;
            }
            offset += index.byte_size;
            left -= index.byte_size;
        }
    }

    fn push_chunk(&mut self, path: &ObjectPath, data_type: DataType, chunk: DataChunk) {
        if let ObjectPath::Channel(g, c) = path {
            let channel = self.group_mut(g).channel_mut(c);
            channel.data_type = data_type;
            if data_type != DataType::String {
                channel.chunks.push(chunk);
            }
        }
    }
}

fn pick<T>(le: fn(&[u8]) -> T, be: fn(&[u8]) -> T) -> impl Fn(&[u8], bool) -> T {
    move |b, big_endian| if big_endian { be(b) } else { le(b) }
}

fn decode_timestamp(b: &[u8], big_endian: bool) -> TdmsTimestamp {
    if big_endian {
        TdmsTimestamp {
            seconds: BigEndian::read_i64(&b[0..8]),
            fraction: BigEndian::read_u64(&b[8..16]),
        }
    } else {
        TdmsTimestamp {
            fraction: LittleEndian::read_u64(&b[0..8]),
            seconds: LittleEndian::read_i64(&b[8..16]),
        }
    }
}

fn merge_properties(target: &mut Properties, incoming: Properties) {
    for (name, value) in incoming {
        match target.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => target.push((name, value)),
        }
    }
}

type ParsedObject = (ObjectPath, Option<RawIndex>, Properties);

fn parse_metadata(
    buf: &[u8],
    big_endian: bool,
    last_index: &mut HashMap<ObjectPath, RawIndex>,
) -> Result<Vec<ParsedObject>> {
    let mut r = MetaReader { cursor: Cursor::new(buf), big_endian };
    let object_count = r.u32()?;
    let mut objects = Vec::new();

    for _ in 0..object_count {
        let path = ObjectPath::parse(&r.string()?)?;
        let index_len = r.u32()?;
        let index = match index_len {
            NO_RAW_DATA => None,
            RAW_INDEX_SAME_AS_PREVIOUS => Some(last_index.get(&path).cloned().ok_or_else(|| {
                TdviewError::InvalidTdms(format!("{path} reuses a raw data index it never had"))
            })?),
            _ => {
                let data_type = DataType::from_code(r.u32()?)?;
                let dimension = r.u32()?;
                if dimension != 1 {
                    return Err(TdviewError::InvalidTdms(format!(
                        "{path} has array dimension {dimension}"
                    )));
                }
                let count = to_usize(r.u64()?)?;
                let byte_size = match data_type.size() {
                    Some(size) => count.checked_mul(size).ok_or_else(|| {
                        TdviewError::InvalidTdms(format!("{path} raw data size overflows"))
                    })?,
                    None => to_usize(r.u64()?)?,
                };
                Some(RawIndex { data_type, count, byte_size })
            }
        };
        if let Some(ref idx) = index {
            last_index.insert(path.clone(), idx.clone());
        }

        let property_count = r.u32()?;
        let mut properties = Vec::new();
        for _ in 0..property_count {
            let name = r.string()?;
            let data_type = DataType::from_code(r.u32()?)?;
            properties.push((name, r.property_value(data_type)?));
        }
        objects.push((path, index, properties));
    }
    Ok(objects)
}

fn to_usize(v: u64) -> Result<usize> {
    usize::try_from(v).map_err(|_| TdviewError::InvalidTdms(format!("value {v} exceeds usize")))
}

struct MetaReader<'a> {
    cursor: Cursor<&'a [u8]>,
    big_endian: bool,
}

impl<'a> MetaReader<'a> {
    fn u32(&mut self) -> Result<u32> {
        let v = if self.big_endian {
            self.cursor.read_u32::<BigEndian>()
        } else {
            self.cursor.read_u32::<LittleEndian>()
        };
        v.map_err(truncated)
    }

    fn u64(&mut self) -> Result<u64> {
        let v = if self.big_endian {
            self.cursor.read_u64::<BigEndian>()
        } else {
            self.cursor.read_u64::<LittleEndian>()
        };
        v.map_err(truncated)
    }

    fn bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let start = self.cursor.position() as usize;
        let buf: &'a [u8] = *self.cursor.get_ref();
        let slice = buf
            .get(start..start.saturating_add(n))
            .ok_or_else(|| TdviewError::InvalidTdms("truncated metadata".into()))?;
        self.cursor.set_position((start + n) as u64);
        Ok(slice)
    }

    fn num<T>(&mut self, size: usize, le: fn(&[u8]) -> T, be: fn(&[u8]) -> T) -> Result<T> {
        let big_endian = self.big_endian;
        Ok(pick(le, be)(self.bytes(size)?, big_endian))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        Ok(String::from_utf8_lossy(self.bytes(len)?).into_owned())
    }

    fn property_value(&mut self, data_type: DataType) -> Result<PropertyValue> {
        Ok(match data_type {
            DataType::String => PropertyValue::String(self.string()?),
            DataType::Bool => PropertyValue::Bool(self.bytes(1)?[0] != 0),
            DataType::Timestamp => PropertyValue::Timestamp(decode_timestamp(self.bytes(16)?, self.big_endian)),
            DataType::I8 => PropertyValue::Int(self.bytes(1)?[0] as i8 as i64),
            DataType::U8 => PropertyValue::UInt(self.bytes(1)?[0] as u64),
            DataType::I16 => PropertyValue::Int(self.num(2, LittleEndian::read_i16, BigEndian::read_i16)? as i64),
            DataType::U16 => PropertyValue::UInt(self.num(2, LittleEndian::read_u16, BigEndian::read_u16)? as u64),
            DataType::I32 => PropertyValue::Int(self.num(4, LittleEndian::read_i32, BigEndian::read_i32)? as i64),
            DataType::U32 => PropertyValue::UInt(self.num(4, LittleEndian::read_u32, BigEndian::read_u32)? as u64),
            DataType::I64 => PropertyValue::Int(self.num(8, LittleEndian::read_i64, BigEndian::read_i64)?),
            DataType::U64 => PropertyValue::UInt(self.num(8, LittleEndian::read_u64, BigEndian::read_u64)?),
            DataType::F32 => PropertyValue::Float(self.num(4, LittleEndian::read_f32, BigEndian::read_f32)? as f64),
            DataType::F64 => PropertyValue::Float(self.num(8, LittleEndian::read_f64, BigEndian::read_f64)?),
            DataType::Void => {
                return Err(TdviewError::UnsupportedDataType(DataType::Void.code()))
            }
        })
    }
}

fn truncated(e: std::io::Error) -> TdviewError {
    TdviewError::InvalidTdms(format!("truncated metadata: {e}"))
}
