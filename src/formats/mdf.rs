use byteorder::{LittleEndian, WriteBytesExt};
use log::debug;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::Result;
use crate::models::{Channel, SampleTable};

// MDF 4.10 block geometry. Every block starts with a 24-byte header
// (4-byte id, 4 reserved, u64 length, u64 link count) followed by the link
// list and the data section. All block addresses are 8-byte aligned; the
// sizes below are chosen so the file lays out densely with no padding gaps.
const ID_BLOCK_SIZE: u64 = 64;
const HD_BLOCK_SIZE: u64 = 24 + 6 * 8 + 32;
const FH_BLOCK_SIZE: u64 = 24 + 2 * 8 + 16;
const DG_BLOCK_SIZE: u64 = 24 + 4 * 8 + 8;
const CG_BLOCK_SIZE: u64 = 24 + 6 * 8 + 32;
const CN_BLOCK_SIZE: u64 = 24 + 8 * 8 + 72;

// One record per sample: master time (f64 seconds) + value (f64).
const RECORD_SIZE: u64 = 16;

// cn_data_type 4 = IEEE 754 floating point, little endian.
const DATA_TYPE_FLOAT_LE: u8 = 4;
// cn_type 2 = master channel, cn_sync_type 1 = time.
const CHANNEL_TYPE_MASTER: u8 = 2;
const SYNC_TYPE_TIME: u8 = 1;

const TIME_CHANNEL_NAME: &str = "time";
const TIME_UNIT: &str = "s";

/// Per-channel block addresses, resolved in the layout pass.
struct ChannelLayout {
    tx_name: u64,
    dg: u64,
    cg: u64,
    cn_time: u64,
    cn_value: u64,
    dt: u64,
}

/// Serializer for ASAM MDF version 4.10 measurement files.
///
/// Each signal becomes its own data group with a two-channel group (time
/// master + value) and its own record stream, so every signal keeps an
/// independent time base. The whole file is assembled in memory and written
/// with a single `File::create`, truncating any existing file.
pub struct Mdf4Formatter {
    program_id: [u8; 8],
}

impl Mdf4Formatter {
    /// Create a formatter stamping `program_id` into the ID block
    /// (space-padded or truncated to 8 bytes).
    pub fn new(program_id: &str) -> Self {
        let mut id = [b' '; 8];
        for (slot, byte) in id.iter_mut().zip(program_id.bytes()) {
            *slot = byte;
        }
        Self { program_id: id }
    }

    /// Serialize the table into a complete MDF 4.10 file image.
    ///
    /// An empty table yields a valid container with zero data groups.
    pub fn to_bytes(&self, table: &SampleTable) -> Result<Vec<u8>> {
        let channels = table.channels();
        let start_time_ns = table.start_time_ns().unwrap_or(0).max(0) as u64;
        let fh_comment = format!(
            "<FHcomment><TX>created</TX><tool_id>{}</tool_id>\
             <tool_vendor>{}</tool_vendor><tool_version>{}</tool_version></FHcomment>",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION"),
        );

        // Layout pass: assign every block its address.
        let hd = ID_BLOCK_SIZE;
        let fh = hd + HD_BLOCK_SIZE;
        let fh_md = fh + FH_BLOCK_SIZE;
        let tx_time = fh_md + text_block_size(&fh_comment);
        let tx_time_unit = tx_time + text_block_size(TIME_CHANNEL_NAME);
        let mut offset = tx_time_unit + text_block_size(TIME_UNIT);

        let mut layouts = Vec::with_capacity(channels.len());
        for channel in &channels {
            let tx_name = offset;
            offset += text_block_size(&channel.name);
            let dg = offset;
            offset += DG_BLOCK_SIZE;
            let cg = offset;
            offset += CG_BLOCK_SIZE;
            let cn_time = offset;
            offset += CN_BLOCK_SIZE;
            let cn_value = offset;
            offset += CN_BLOCK_SIZE;
            let dt = offset;
            offset += 24 + channel.samples.len() as u64 * RECORD_SIZE;

            layouts.push(ChannelLayout {
                tx_name,
                dg,
                cg,
                cn_time,
                cn_value,
                dt,
            });
        }

        debug!(
            "MDF layout: {} channel(s), {} bytes",
            channels.len(),
            offset
        );

        // Emit pass.
        let mut buf = Vec::with_capacity(offset as usize);

        self.write_id_block(&mut buf)?;
        write_hd_block(
            &mut buf,
            layouts.first().map(|l| l.dg).unwrap_or(0),
            fh,
            start_time_ns,
        )?;
        write_fh_block(&mut buf, fh_md, start_time_ns)?;
        write_text_block(&mut buf, b"##MD", &fh_comment)?;
        write_text_block(&mut buf, b"##TX", TIME_CHANNEL_NAME)?;
        write_text_block(&mut buf, b"##TX", TIME_UNIT)?;

        for (i, (channel, layout)) in channels.iter().zip(&layouts).enumerate() {
            debug_assert_eq!(buf.len() as u64, layout.tx_name);

            let dg_next = layouts.get(i + 1).map(|l| l.dg).unwrap_or(0);
            write_text_block(&mut buf, b"##TX", &channel.name)?;
            write_dg_block(&mut buf, dg_next, layout.cg, layout.dt)?;
            write_cg_block(&mut buf, layout.cn_time, channel.samples.len() as u64)?;
            write_cn_time_block(&mut buf, layout.cn_value, tx_time, tx_time_unit)?;
            write_cn_value_block(&mut buf, layout.tx_name)?;
            write_dt_block(&mut buf, channel)?;
        }

        debug_assert_eq!(buf.len() as u64, offset);
        Ok(buf)
    }

    /// Serialize the table and write it to `path`, fully overwriting any
    /// existing file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P, table: &SampleTable) -> Result<()> {
        let bytes = self.to_bytes(table)?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&bytes)?;
        file.flush()?;
        Ok(())
    }

    // 64-byte identification block: magic, version string, program id,
    // numeric version 410.
    fn write_id_block(&self, buf: &mut Vec<u8>) -> Result<()> {
        buf.extend_from_slice(b"MDF     ");
        buf.extend_from_slice(b"4.10    ");
        buf.extend_from_slice(&self.program_id);
        buf.write_u32::<LittleEndian>(0)?;
        buf.write_u16::<LittleEndian>(410)?;
        buf.resize(buf.len() + 30, 0);
        buf.write_u16::<LittleEndian>(0)?; // id_unfin_flags
        buf.write_u16::<LittleEndian>(0)?; // id_custom_unfin_flags
        Ok(())
    }
}

fn align8(len: u64) -> u64 {
    (len + 7) & !7
}

/// Total size of a ##TX/##MD block holding `text` (zero-terminated, padded
/// to the 8-byte alignment the link rules require).
fn text_block_size(text: &str) -> u64 {
    24 + align8(text.len() as u64 + 1)
}

fn write_block_header(buf: &mut Vec<u8>, id: &[u8; 4], length: u64, link_count: u64) -> Result<()> {
    buf.extend_from_slice(id);
    buf.write_u32::<LittleEndian>(0)?;
    buf.write_u64::<LittleEndian>(length)?;
    buf.write_u64::<LittleEndian>(link_count)?;
    Ok(())
}

fn write_text_block(buf: &mut Vec<u8>, id: &[u8; 4], text: &str) -> Result<()> {
    let payload = align8(text.len() as u64 + 1) as usize;
    write_block_header(buf, id, 24 + payload as u64, 0)?;
    buf.extend_from_slice(text.as_bytes());
    buf.resize(buf.len() + payload - text.len(), 0);
    Ok(())
}

// Header block. The start time is the earliest sample timestamp; no
// wall-clock fields are written anywhere in the file.
fn write_hd_block(buf: &mut Vec<u8>, dg_first: u64, fh_first: u64, start_time_ns: u64) -> Result<()> {
    write_block_header(buf, b"##HD", HD_BLOCK_SIZE, 6)?;
    buf.write_u64::<LittleEndian>(dg_first)?;
    buf.write_u64::<LittleEndian>(fh_first)?;
    buf.write_u64::<LittleEndian>(0)?; // hd_ch_first
    buf.write_u64::<LittleEndian>(0)?; // hd_at_first
    buf.write_u64::<LittleEndian>(0)?; // hd_ev_first
    buf.write_u64::<LittleEndian>(0)?; // hd_md_comment
    buf.write_u64::<LittleEndian>(start_time_ns)?;
    buf.write_i16::<LittleEndian>(0)?; // hd_tz_offset_min
    buf.write_i16::<LittleEndian>(0)?; // hd_dst_offset_min
    buf.write_u8(0)?; // hd_time_flags
    buf.write_u8(0)?; // hd_time_class
    buf.write_u8(0)?; // hd_flags
    buf.write_u8(0)?;
    buf.write_f64::<LittleEndian>(0.0)?; // hd_start_angle_rad
    buf.write_f64::<LittleEndian>(0.0)?; // hd_start_distance_m
    Ok(())
}

// File history block; the standard requires at least one, with an XML
// comment naming the creating tool.
fn write_fh_block(buf: &mut Vec<u8>, md_comment: u64, time_ns: u64) -> Result<()> {
    write_block_header(buf, b"##FH", FH_BLOCK_SIZE, 2)?;
    buf.write_u64::<LittleEndian>(0)?; // fh_fh_next
    buf.write_u64::<LittleEndian>(md_comment)?;
    buf.write_u64::<LittleEndian>(time_ns)?;
    buf.write_i16::<LittleEndian>(0)?; // fh_tz_offset_min
    buf.write_i16::<LittleEndian>(0)?; // fh_dst_offset_min
    buf.write_u8(0)?; // fh_time_flags
    buf.resize(buf.len() + 3, 0);
    Ok(())
}

fn write_dg_block(buf: &mut Vec<u8>, dg_next: u64, cg_first: u64, data: u64) -> Result<()> {
    write_block_header(buf, b"##DG", DG_BLOCK_SIZE, 4)?;
    buf.write_u64::<LittleEndian>(dg_next)?;
    buf.write_u64::<LittleEndian>(cg_first)?;
    buf.write_u64::<LittleEndian>(data)?;
    buf.write_u64::<LittleEndian>(0)?; // dg_md_comment
    buf.write_u8(0)?; // dg_rec_id_size: sorted data, no record ids
    buf.resize(buf.len() + 7, 0);
    Ok(())
}

fn write_cg_block(buf: &mut Vec<u8>, cn_first: u64, cycle_count: u64) -> Result<()> {
    write_block_header(buf, b"##CG", CG_BLOCK_SIZE, 6)?;
    buf.write_u64::<LittleEndian>(0)?; // cg_cg_next
    buf.write_u64::<LittleEndian>(cn_first)?;
    buf.write_u64::<LittleEndian>(0)?; // cg_tx_acq_name
    buf.write_u64::<LittleEndian>(0)?; // cg_si_acq_source
    buf.write_u64::<LittleEndian>(0)?; // cg_sr_first
    buf.write_u64::<LittleEndian>(0)?; // cg_md_comment
    buf.write_u64::<LittleEndian>(0)?; // cg_record_id
    buf.write_u64::<LittleEndian>(cycle_count)?;
    buf.write_u16::<LittleEndian>(0)?; // cg_flags
    buf.write_u16::<LittleEndian>(0)?; // cg_path_separator
    buf.write_u32::<LittleEndian>(0)?;
    buf.write_u32::<LittleEndian>(RECORD_SIZE as u32)?; // cg_data_bytes
    buf.write_u32::<LittleEndian>(0)?; // cg_inval_bytes
    Ok(())
}

fn write_cn_block(
    buf: &mut Vec<u8>,
    cn_next: u64,
    tx_name: u64,
    md_unit: u64,
    channel_type: u8,
    sync_type: u8,
    byte_offset: u32,
) -> Result<()> {
    write_block_header(buf, b"##CN", CN_BLOCK_SIZE, 8)?;
    buf.write_u64::<LittleEndian>(cn_next)?;
    buf.write_u64::<LittleEndian>(0)?; // cn_composition
    buf.write_u64::<LittleEndian>(tx_name)?;
    buf.write_u64::<LittleEndian>(0)?; // cn_si_source
    buf.write_u64::<LittleEndian>(0)?; // cn_cc_conversion: 1:1
    buf.write_u64::<LittleEndian>(0)?; // cn_data
    buf.write_u64::<LittleEndian>(md_unit)?;
    buf.write_u64::<LittleEndian>(0)?; // cn_md_comment
    buf.write_u8(channel_type)?;
    buf.write_u8(sync_type)?;
    buf.write_u8(DATA_TYPE_FLOAT_LE)?;
    buf.write_u8(0)?; // cn_bit_offset
    buf.write_u32::<LittleEndian>(byte_offset)?;
    buf.write_u32::<LittleEndian>(64)?; // cn_bit_count
    buf.write_u32::<LittleEndian>(0)?; // cn_flags
    buf.write_u32::<LittleEndian>(0)?; // cn_inval_bit_pos
    buf.write_u8(0)?; // cn_precision
    buf.write_u8(0)?;
    buf.write_u16::<LittleEndian>(0)?; // cn_attachment_count
    buf.write_f64::<LittleEndian>(0.0)?; // cn_val_range_min
    buf.write_f64::<LittleEndian>(0.0)?; // cn_val_range_max
    buf.write_f64::<LittleEndian>(0.0)?; // cn_limit_min
    buf.write_f64::<LittleEndian>(0.0)?; // cn_limit_max
    buf.write_f64::<LittleEndian>(0.0)?; // cn_limit_ext_min
    buf.write_f64::<LittleEndian>(0.0)?; // cn_limit_ext_max
    Ok(())
}

fn write_cn_time_block(buf: &mut Vec<u8>, cn_next: u64, tx_name: u64, md_unit: u64) -> Result<()> {
    write_cn_block(
        buf,
        cn_next,
        tx_name,
        md_unit,
        CHANNEL_TYPE_MASTER,
        SYNC_TYPE_TIME,
        0,
    )
}

fn write_cn_value_block(buf: &mut Vec<u8>, tx_name: u64) -> Result<()> {
    write_cn_block(buf, 0, tx_name, 0, 0, 0, 8)
}

fn write_dt_block(buf: &mut Vec<u8>, channel: &Channel) -> Result<()> {
    let length = 24 + channel.samples.len() as u64 * RECORD_SIZE;
    write_block_header(buf, b"##DT", length, 0)?;
    for sample in &channel.samples {
        buf.write_f64::<LittleEndian>(sample.time)?;
        buf.write_f64::<LittleEndian>(sample.value)?;
    }
    Ok(())
}
