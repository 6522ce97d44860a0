mod common;

use pretty_assertions::assert_eq;
use texel_buffer::{
    BufferDescriptor, ElementType, HostArray, SlotState, TextureStorage, WrapMode,
};
use texel_wgpu::{WgpuBuffer, WgpuContext};

fn context(test_name: &str) -> Option<WgpuContext> {
    common::device(test_name).map(WgpuContext::new)
}

#[test]
fn f32_round_trip_across_widths() {
    let Some(ctx) = context(concat!(module_path!(), "::f32_round_trip_across_widths")) else {
        return;
    };

    // 1000 components do not fill the last texture row for any width.
    let data: Vec<f32> = (0..1000).map(|i| i as f32 * 0.5 - 17.0).collect();
    for width in [1u32, 2, 4] {
        let buf = ctx
            .create_buffer(BufferDescriptor::with_data(data.clone()).vector_width(width))
            .unwrap();
        assert_eq!(buf.to_host(None).unwrap(), HostArray::F32(data.clone()), "width {width}");
    }
}

#[test]
fn integer_and_half_types_round_trip() {
    let Some(ctx) = context(concat!(module_path!(), "::integer_and_half_types_round_trip")) else {
        return;
    };

    let arrays = [
        HostArray::U8((0..=255).collect()),
        HostArray::I16((-300..300).collect()),
        HostArray::U32((0..77).map(|v| v << 20).collect()),
        HostArray::F16((0..64).map(|v| texel_buffer::f16::from_f32(v as f32 / 4.0)).collect()),
    ];
    for data in arrays {
        let buf = ctx
            .create_buffer(BufferDescriptor::with_data(data.clone()).vector_width(2))
            .unwrap();
        assert_eq!(buf.to_host(None).unwrap(), data);
    }
}

#[test]
fn clamped_bytes_are_stored_as_u8() {
    let Some(ctx) = context(concat!(module_path!(), "::clamped_bytes_are_stored_as_u8")) else {
        return;
    };

    let buf = ctx
        .create_buffer(BufferDescriptor::with_data(HostArray::clamped(vec![0, 128, 255])))
        .unwrap();
    assert_eq!(buf.element_type(), ElementType::U8);
    assert_eq!(
        buf.to_host(Some(HostArray::clamped(vec![0; 3]))).unwrap(),
        HostArray::U8(vec![0, 128, 255])
    );
}

#[test]
fn writable_becomes_readable_after_finish() {
    let Some(ctx) = context(concat!(module_path!(), "::writable_becomes_readable_after_finish"))
    else {
        return;
    };

    let mut buf: WgpuBuffer = ctx
        .create_buffer(BufferDescriptor::with_data(vec![1.0f32, 2.0, 3.0, 4.0]))
        .unwrap();

    // A fresh writable starts out as a copy of the readable.
    let writable = buf.request_writable().unwrap();
    let mut seen = vec![0u8; 16];
    writable.read(&mut seen).unwrap();
    assert_eq!(seen, f32_bytes(&[1.0, 2.0, 3.0, 4.0]));

    writable.upload(&f32_bytes(&[5.0, 6.0, 7.0, 8.0])).unwrap();
    assert_eq!(buf.state(), SlotState::Pending);
    assert_eq!(buf.to_host(None).unwrap(), HostArray::F32(vec![1.0, 2.0, 3.0, 4.0]));

    buf.finish();
    assert_eq!(buf.state(), SlotState::Live);
    assert_eq!(buf.to_host(None).unwrap(), HostArray::F32(vec![5.0, 6.0, 7.0, 8.0]));
}

#[test]
fn copy_is_independent_of_source() {
    let Some(ctx) = context(concat!(module_path!(), "::copy_is_independent_of_source")) else {
        return;
    };

    let mut src = ctx
        .create_buffer(BufferDescriptor::with_data(vec![9i32, -9, 90, -90]))
        .unwrap();
    let copy = src.copy().unwrap();
    assert_eq!(copy.dimensions(), src.dimensions());

    src.to_device(&HostArray::I32(vec![0, 0, 0, 0])).unwrap();
    assert_eq!(copy.to_host(None).unwrap(), HostArray::I32(vec![9, -9, 90, -90]));
    assert_eq!(src.to_host(None).unwrap(), HostArray::I32(vec![0, 0, 0, 0]));
}

#[test]
fn async_read_matches_blocking_read() {
    let Some(ctx) = context(concat!(module_path!(), "::async_read_matches_blocking_read")) else {
        return;
    };
    assert!(ctx.caps().async_readback);

    let data: Vec<u16> = (0..513).collect();
    let buf = ctx
        .create_buffer(BufferDescriptor::with_data(data.clone()).vector_width(4))
        .unwrap();
    let reader = buf.async_reader().expect("wgpu devices read back asynchronously");
    let host = pollster::block_on(reader.to_host(None)).unwrap();
    assert_eq!(host, HostArray::U16(data));
    assert_eq!(host, buf.to_host(None).unwrap());
}

#[test]
fn deleted_buffer_reports_missing_readable() {
    let Some(ctx) = context(concat!(module_path!(), "::deleted_buffer_reports_missing_readable"))
    else {
        return;
    };

    let mut buf = ctx.create_buffer(BufferDescriptor::with_len(8)).unwrap();
    buf.request_writable().unwrap();
    buf.delete();
    assert_eq!(buf.state(), SlotState::Deleted);
    assert!(matches!(
        buf.to_host(None),
        Err(texel_buffer::BufferError::MissingReadable)
    ));
    assert!(pollster::block_on(buf.async_reader().unwrap().to_host(None)).is_err());
}

#[test]
fn sampler_follows_wrap_policy() {
    let Some(ctx) = context(concat!(module_path!(), "::sampler_follows_wrap_policy")) else {
        return;
    };

    let buf = ctx
        .create_buffer(BufferDescriptor::with_len(4).wrap((WrapMode::Repeat, WrapMode::MirroredRepeat)))
        .unwrap();
    let sampler = buf.readable().unwrap().sampler_descriptor();
    assert_eq!(sampler.address_mode_u, wgpu::AddressMode::Repeat);
    assert_eq!(sampler.address_mode_v, wgpu::AddressMode::MirrorRepeat);
    assert_eq!(sampler.mag_filter, wgpu::FilterMode::Nearest);
}

fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}
