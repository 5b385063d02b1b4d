use criterion::{black_box, criterion_group, criterion_main, Criterion};

use msm4::bits;
use msm4::checksum::crc24q;
use msm4::prelude::{convert, FreqSelection};

/// One GPS MSM4 frame: four satellites, "1C" and "2W" signals,
/// every cell populated.
fn gps_frame() -> Vec<u8> {
    let sats = [4_usize, 9, 17, 23];
    let sigs = [2_usize, 10];

    let mut buf = vec![0; 1200];
    bits::set_unsigned(&mut buf, 0, 8, 0xD3);
    bits::set_unsigned(&mut buf, 24, 12, 1074);
    bits::set_unsigned(&mut buf, 36, 12, 1000);
    bits::set_unsigned(&mut buf, 48, 30, 123_456_789);

    for sat in sats.iter() {
        bits::set_unsigned(&mut buf, 97 + sat - 1, 1, 1);
    }
    for sig in sigs.iter() {
        bits::set_unsigned(&mut buf, 161 + sig - 1, 1, 1);
    }
    let ncell = sats.len() * sigs.len();
    let mut i = 193;
    for _ in 0..ncell {
        bits::set_unsigned(&mut buf, i, 1, 1);
        i += 1;
    }
    for j in 0..sats.len() {
        bits::set_unsigned(&mut buf, i, 8, 70 + j as u32);
        i += 8;
    }
    for j in 0..sats.len() {
        bits::set_unsigned(&mut buf, i, 10, 100 + j as u32);
        i += 10;
    }
    for j in 0..ncell {
        bits::set_signed(&mut buf, i, 15, 1000 + j as i32);
        i += 15;
    }
    for j in 0..ncell {
        bits::set_signed(&mut buf, i, 22, 4000 + j as i32);
        i += 22;
    }
    for _ in 0..ncell {
        bits::set_unsigned(&mut buf, i, 4, 10);
        i += 4;
    }
    for _ in 0..ncell {
        bits::set_unsigned(&mut buf, i, 1, 0);
        i += 1;
    }
    for _ in 0..ncell {
        bits::set_unsigned(&mut buf, i, 6, 45);
        i += 6;
    }
    while i % 8 != 0 {
        bits::set_unsigned(&mut buf, i, 1, 0);
        i += 1;
    }
    let len = i / 8;
    bits::set_unsigned(&mut buf, 14, 10, (len - 3) as u32);
    let crc = crc24q(&buf[..len]);
    bits::set_unsigned(&mut buf, len * 8, 24, crc);
    buf.truncate(len + 3);
    buf
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let frame = gps_frame();
    let mut output = [0; 1200];

    let all = FreqSelection::from_bands(["L1+L2", "", "", "", "", "", ""]);
    c.bench_function("convert-msm4-passthrough", |b| {
        b.iter(|| {
            black_box(convert(0, &frame, &all, &mut output).unwrap());
        })
    });

    let l1 = FreqSelection::from_bands(["L1", "", "", "", "", "", ""]);
    c.bench_function("convert-msm4-filtering", |b| {
        b.iter(|| {
            black_box(convert(0, &frame, &l1, &mut output).unwrap());
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
