//! BIFF8 encoding of a [`Workbook`] and OLE2 packaging
//!
//! Layout of the `Workbook` stream:
//!
//! ```text
//! globals:  BOF CODEPAGE WINDOW1 FONT×4 XF×16 STYLE BOUNDSHEET SST [CONTINUE…] EXTSST EOF
//! sheet:    BOF COLINFO… DIMENSIONS (ROW×≤32 LABELSST…)… WINDOW2 EOF
//! ```
//!
//! All cells are text and go through the shared string table. The stream is
//! zero-padded to 4096 bytes so it never lands in the compound file's mini stream.

use super::workbook::{Row, Sheet, Workbook};
use crate::error::{TabularError, TabularResult};
use std::collections::HashMap;
use std::io::{Cursor, Write};

/// Largest record body; longer content goes into CONTINUE records
const MAX_RECORD_DATA: usize = 8224;
const MIN_WORKBOOK_STREAM: usize = 4096;
const ROWS_PER_BLOCK: usize = 32;
/// First cell XF, after the 15 style XFs
const CELL_XF: u16 = 15;

const BIFF8_VERSION: u16 = 0x0600;
const DT_GLOBALS: u16 = 0x0005;
const DT_WORKSHEET: u16 = 0x0010;
const CODEPAGE_UTF16: u16 = 1200;
/// ROW flags: always-set bit plus "height differs from font height"
const ROW_CUSTOM_HEIGHT: u16 = 0x0140;
/// XLUnicodeString option byte: uncompressed UTF-16LE characters
const HIGH_BYTE: u8 = 0x01;

mod record {
    pub const BOF: u16 = 0x0809;
    pub const EOF: u16 = 0x000A;
    pub const CODEPAGE: u16 = 0x0042;
    pub const WINDOW1: u16 = 0x003D;
    pub const FONT: u16 = 0x0031;
    pub const XF: u16 = 0x00E0;
    pub const STYLE: u16 = 0x0293;
    pub const BOUNDSHEET: u16 = 0x0085;
    pub const SST: u16 = 0x00FC;
    pub const CONTINUE: u16 = 0x003C;
    pub const EXTSST: u16 = 0x00FF;
    pub const COLINFO: u16 = 0x007D;
    pub const DIMENSIONS: u16 = 0x0200;
    pub const ROW: u16 = 0x0208;
    pub const LABELSST: u16 = 0x00FD;
    pub const WINDOW2: u16 = 0x023E;
}

/// Little-endian record body builder
#[derive(Default)]
struct Body(Vec<u8>);

impl Body {
    fn u8(mut self, value: u8) -> Self {
        self.0.push(value);
        self
    }

    fn u16(mut self, value: u16) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    fn u32(mut self, value: u32) -> Self {
        self.0.extend_from_slice(&value.to_le_bytes());
        self
    }

    /// ShortXLUnicodeString: 8-bit length, option byte, UTF-16LE characters
    fn short_string(mut self, text: &str) -> Self {
        let units: Vec<u16> = text.encode_utf16().take(u8::MAX as usize).collect();
        self.0.push(units.len() as u8);
        self.0.push(HIGH_BYTE);
        for unit in units {
            self.0.extend_from_slice(&unit.to_le_bytes());
        }
        self
    }
}

struct RecordWriter {
    buf: Vec<u8>,
}

impl RecordWriter {
    fn new() -> Self {
        Self { buf: Vec::new() }
    }

    fn record(&mut self, id: u16, data: &[u8]) {
        debug_assert!(data.len() <= MAX_RECORD_DATA);
        self.buf.extend_from_slice(&id.to_le_bytes());
        self.buf.extend_from_slice(&(data.len() as u16).to_le_bytes());
        self.buf.extend_from_slice(data);
    }

    fn position(&self) -> usize {
        self.buf.len()
    }

    fn patch_u32(&mut self, at: usize, value: u32) {
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Shared string table with deduplication
#[derive(Default)]
struct SharedStrings {
    strings: Vec<String>,
    index: HashMap<String, u32>,
    total: u32,
}

impl SharedStrings {
    fn intern(&mut self, text: &str) -> u32 {
        self.total += 1;
        if let Some(&idx) = self.index.get(text) {
            return idx;
        }
        let idx = self.strings.len() as u32;
        self.strings.push(text.to_string());
        self.index.insert(text.to_string(), idx);
        idx
    }

    /// EXTSST bucket size, keeping the bucket count at 128 or less
    fn strings_per_bucket(&self) -> usize {
        std::cmp::max(8, self.strings.len().div_ceil(128))
    }
}

/// SST content split into record-sized chunks
struct SstChunks {
    chunks: Vec<Vec<u8>>,
    /// (chunk, offset in chunk) of the first string of every EXTSST bucket
    bucket_starts: Vec<(usize, usize)>,
    strings_per_bucket: usize,
}

fn split_sst(sst: &SharedStrings) -> SstChunks {
    let strings_per_bucket = sst.strings_per_bucket();
    let mut chunks = Vec::new();
    let mut bucket_starts = Vec::new();
    let mut current = Body::default()
        .u32(sst.total)
        .u32(sst.strings.len() as u32)
        .0;

    for (idx, text) in sst.strings.iter().enumerate() {
        let units: Vec<u16> = text.encode_utf16().collect();

        // String header and the first character stay together
        let first_unit = units.first().map_or(0, |&u| unit_span(u));
        if current.len() + 3 + first_unit > MAX_RECORD_DATA {
            chunks.push(std::mem::take(&mut current));
        }
        if idx % strings_per_bucket == 0 {
            bucket_starts.push((chunks.len(), current.len()));
        }

        current.extend_from_slice(&(units.len() as u16).to_le_bytes());
        current.push(HIGH_BYTE);

        let mut iter = units.iter().peekable();
        while let Some(&unit) = iter.next() {
            // Never split a surrogate pair across records
            if current.len() + unit_span(unit) > MAX_RECORD_DATA {
                chunks.push(std::mem::replace(&mut current, vec![HIGH_BYTE]));
            }
            current.extend_from_slice(&unit.to_le_bytes());
            if is_high_surrogate(unit) {
                if let Some(&&low) = iter.peek() {
                    current.extend_from_slice(&low.to_le_bytes());
                    iter.next();
                }
            }
        }
    }
    chunks.push(current);

    SstChunks {
        chunks,
        bucket_starts,
        strings_per_bucket,
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

fn unit_span(unit: u16) -> usize {
    if is_high_surrogate(unit) {
        4
    } else {
        2
    }
}

fn write_sst(w: &mut RecordWriter, sst: &SharedStrings) {
    let layout = split_sst(sst);

    let mut chunk_positions = Vec::with_capacity(layout.chunks.len());
    for (idx, chunk) in layout.chunks.iter().enumerate() {
        chunk_positions.push(w.position());
        let id = if idx == 0 {
            record::SST
        } else {
            record::CONTINUE
        };
        w.record(id, chunk);
    }

    let mut extsst = Body::default().u16(layout.strings_per_bucket as u16);
    for (chunk, offset) in layout.bucket_starts {
        // Offsets count the 4-byte record header
        extsst = extsst
            .u32((chunk_positions[chunk] + 4 + offset) as u32)
            .u16((4 + offset) as u16)
            .u16(0);
    }
    w.record(record::EXTSST, &extsst.0);
}

fn bof(dt: u16) -> Vec<u8> {
    Body::default()
        .u16(BIFF8_VERSION)
        .u16(dt)
        .u16(0x0DBB) // build
        .u16(0x07CC) // year
        .u32(0)
        .u32(0x0006) // lowest BIFF version that can read the file
        .0
}

fn window1() -> Vec<u8> {
    Body::default()
        .u16(0x0168)
        .u16(0x010E)
        .u16(0x3A5C)
        .u16(0x23BE)
        .u16(0x0038)
        .u16(0) // active tab
        .u16(0) // first visible tab
        .u16(1) // selected tabs
        .u16(0x0258)
        .0
}

fn font() -> Vec<u8> {
    Body::default()
        .u16(200) // 10pt, in twips
        .u16(0)
        .u16(0x7FFF) // automatic color
        .u16(400) // normal weight
        .u16(0)
        .u8(0)
        .u8(0)
        .u8(0)
        .u8(0)
        .short_string("Arial")
        .0
}

fn xf(style: bool) -> Vec<u8> {
    let (protection, used_attributes) = if style {
        (0xFFF5, 0xF4)
    } else {
        (0x0001, 0x00)
    };
    Body::default()
        .u16(0) // font
        .u16(0) // number format: General
        .u16(protection)
        .u8(0x20) // bottom aligned
        .u8(0)
        .u8(0)
        .u8(used_attributes)
        .u32(0)
        .u32(0)
        .u16(0x20C0) // pattern colors
        .0
}

fn window2() -> Vec<u8> {
    Body::default()
        .u16(0x06B6)
        .u16(0) // top row
        .u16(0) // left column
        .u32(0x40) // gridline color
        .u16(0)
        .u16(0)
        .u32(0)
        .0
}

fn row_record(index: u16, row: &Row) -> Vec<u8> {
    Body::default()
        .u16(index)
        .u16(0)
        .u16(row.cells.len() as u16)
        .u16(row.height)
        .u16(0)
        .u16(0)
        .u16(ROW_CUSTOM_HEIGHT)
        .u16(CELL_XF)
        .0
}

fn write_sheet(w: &mut RecordWriter, sheet: &Sheet, cells: &[Vec<u32>]) {
    w.record(record::BOF, &bof(DT_WORKSHEET));

    for (col, width) in sheet.column_widths() {
        let colinfo = Body::default()
            .u16(col)
            .u16(col)
            .u16(width)
            .u16(CELL_XF)
            .u16(0)
            .u16(0);
        w.record(record::COLINFO, &colinfo.0);
    }

    let rows = sheet.rows();
    let dimensions = Body::default()
        .u32(0)
        .u32(rows.len() as u32)
        .u16(0)
        .u16(sheet.column_count() as u16)
        .u16(0);
    w.record(record::DIMENSIONS, &dimensions.0);

    for (block, block_rows) in rows.chunks(ROWS_PER_BLOCK).enumerate() {
        let first = block * ROWS_PER_BLOCK;
        for (offset, row) in block_rows.iter().enumerate() {
            w.record(record::ROW, &row_record((first + offset) as u16, row));
        }
        for offset in 0..block_rows.len() {
            let index = first + offset;
            for (col, &isst) in cells[index].iter().enumerate() {
                let label = Body::default()
                    .u16(index as u16)
                    .u16(col as u16)
                    .u16(CELL_XF)
                    .u32(isst);
                w.record(record::LABELSST, &label.0);
            }
        }
    }

    w.record(record::WINDOW2, &window2());
    w.record(record::EOF, &[]);
}

/// Encode the `Workbook` stream
pub(crate) fn workbook_stream(workbook: &Workbook) -> Vec<u8> {
    let sheet = workbook.sheet();

    let mut sst = SharedStrings::default();
    let cells: Vec<Vec<u32>> = sheet
        .rows()
        .iter()
        .map(|row| row.cells.iter().map(|cell| sst.intern(cell)).collect())
        .collect();

    let mut w = RecordWriter::new();
    w.record(record::BOF, &bof(DT_GLOBALS));
    w.record(record::CODEPAGE, &Body::default().u16(CODEPAGE_UTF16).0);
    w.record(record::WINDOW1, &window1());
    for _ in 0..4 {
        w.record(record::FONT, &font());
    }
    for _ in 0..CELL_XF {
        w.record(record::XF, &xf(true));
    }
    w.record(record::XF, &xf(false));
    // Built-in "Normal" style on XF 0
    w.record(record::STYLE, &Body::default().u16(0x8000).u8(0).u8(0xFF).0);

    // Sheet offset is patched once the globals are complete
    let sheet_offset_at = w.position() + 4;
    let boundsheet = Body::default()
        .u32(0)
        .u8(0) // visible
        .u8(0) // worksheet
        .short_string(sheet.name());
    w.record(record::BOUNDSHEET, &boundsheet.0);

    write_sst(&mut w, &sst);
    w.record(record::EOF, &[]);

    let sheet_offset = w.position() as u32;
    w.patch_u32(sheet_offset_at, sheet_offset);
    write_sheet(&mut w, sheet, &cells);

    let mut stream = w.into_inner();
    if stream.len() < MIN_WORKBOOK_STREAM {
        stream.resize(MIN_WORKBOOK_STREAM, 0);
    }
    stream
}

/// Wrap a `Workbook` stream in an OLE2 compound file
pub(crate) fn compound_file(stream: &[u8]) -> TabularResult<Vec<u8>> {
    let mut compound =
        cfb::CompoundFile::create_with_version(cfb::Version::V3, Cursor::new(Vec::new()))
            .map_err(|e| TabularError::export_with("Failed to create compound file", e))?;

    {
        let mut workbook = compound
            .create_stream("/Workbook")
            .map_err(|e| TabularError::export_with("Failed to create Workbook stream", e))?;
        workbook
            .write_all(stream)
            .and_then(|_| workbook.flush())
            .map_err(|e| TabularError::export_with("Failed to write Workbook stream", e))?;
    }

    compound
        .flush()
        .map_err(|e| TabularError::export_with("Failed to finish compound file", e))?;

    Ok(compound.into_inner().into_inner())
}
