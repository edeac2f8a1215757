#![allow(dead_code)]

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};

/// One ICNS element: its OSType and payload.
pub type IcnsElement = ([u8; 4], Vec<u8>);

/// One ICO directory entry as stored on disk, plus the payload it points at.
#[derive(Debug)]
pub struct IcoEntry {
    pub width: u8,
    pub height: u8,
    pub num_colors: u8,
    pub reserved: u8,
    pub color_planes: u16,
    pub bits_per_pixel: u16,
    pub data_size: u32,
    pub data_offset: u32,
    pub data: Vec<u8>,
}

/// Parses an ICNS file, checking that the declared lengths add up.
pub fn parse_icns(bytes: &[u8]) -> Vec<IcnsElement> {
    let mut reader = Cursor::new(bytes);
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic).unwrap();
    assert_eq!(&magic, b"icns");
    let file_length = reader.read_u32::<BigEndian>().unwrap();
    assert_eq!(file_length as usize, bytes.len());
    let mut elements = Vec::new();
    while (reader.position() as usize) < bytes.len() {
        let mut ostype = [0u8; 4];
        reader.read_exact(&mut ostype).unwrap();
        let element_length = reader.read_u32::<BigEndian>().unwrap();
        assert!(element_length >= 8);
        let mut data = vec![0u8; element_length as usize - 8];
        reader.read_exact(&mut data).unwrap();
        elements.push((ostype, data));
    }
    elements
}

/// Parses an ICO file, checking the header and that payloads exactly tile
/// the space after the directory.
pub fn parse_ico(bytes: &[u8]) -> Vec<IcoEntry> {
    let mut reader = Cursor::new(bytes);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 0);
    assert_eq!(reader.read_u16::<LittleEndian>().unwrap(), 1);
    let count = reader.read_u16::<LittleEndian>().unwrap() as usize;
    let mut entries = Vec::with_capacity(count);
    let mut expected_offset = 6 + 16 * count as u32;
    for _ in 0..count {
        let width = reader.read_u8().unwrap();
        let height = reader.read_u8().unwrap();
        let num_colors = reader.read_u8().unwrap();
        let reserved = reader.read_u8().unwrap();
        let color_planes = reader.read_u16::<LittleEndian>().unwrap();
        let bits_per_pixel = reader.read_u16::<LittleEndian>().unwrap();
        let data_size = reader.read_u32::<LittleEndian>().unwrap();
        let data_offset = reader.read_u32::<LittleEndian>().unwrap();
        assert_eq!(data_offset, expected_offset);
        expected_offset += data_size;
        let start = data_offset as usize;
        let data = bytes[start..start + data_size as usize].to_vec();
        entries.push(IcoEntry {
            width,
            height,
            num_colors,
            reserved,
            color_planes,
            bits_per_pixel,
            data_size,
            data_offset,
            data,
        });
    }
    assert_eq!(expected_offset as usize, bytes.len());
    entries
}

/// Deterministic filler bytes of the given length.
pub fn payload(seed: u8, len: usize) -> Vec<u8> {
    (0..len).map(|i| seed.wrapping_mul(31).wrapping_add(i as u8)).collect()
}

/// Encodes a solid-color RGBA PNG of the given size.
pub fn solid_png(size: u32, rgba: [u8; 4]) -> Vec<u8> {
    let mut output = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut output, size, size);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().unwrap();
        let pixels: Vec<u8> = rgba.iter()
            .cycle()
            .take((size * size * 4) as usize)
            .cloned()
            .collect();
        writer.write_image_data(&pixels).unwrap();
        writer.finish().unwrap();
    }
    output
}

/// Returns the dimensions of an encoded PNG.
pub fn png_dimensions(data: &[u8]) -> (u32, u32) {
    let decoder = png::Decoder::new(Cursor::new(data));
    let reader = decoder.read_info().unwrap();
    let info = reader.info();
    (info.width, info.height)
}
