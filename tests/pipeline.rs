//! End-to-end scenarios: bytes in, operators, bytes out.

use pixelmatrix::codec::{bytes_to_fixed, pack_bgra, PackedChannel};
use pixelmatrix::prelude::*;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_blur_of_ones_is_one() {
    init_logging();
    let data = Matrix::from_vec(3, 3, vec![1.0f32; 9]).unwrap();
    let result = convolve(&data, &KernelKind::Blur.float_kernel()).unwrap();
    assert_eq!(result.shape(), (1, 1));
    assert!((result.get(0, 0).unwrap() - 1.0).abs() < 1e-6);
}

#[test]
fn test_default_gaussian_is_centered() {
    let kernel = gaussian_blur_kernel(3, None).unwrap();
    let cells = kernel.to_vec();
    let (max_index, _) = cells
        .iter()
        .enumerate()
        .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best });
    assert_eq!(max_index, 4);
    assert_eq!(cells[0], cells[8]);
    assert_eq!(cells[2], cells[6]);
    assert_eq!(cells[1], cells[7]);
    assert_eq!(cells[3], cells[5]);
}

#[test]
fn test_bgra_scenario() {
    init_logging();
    let bytes = [10u8, 20, 30, 255, 0, 0, 0, 0, 255, 255, 255, 255, 1, 2, 3, 4];
    let decoded =
        decode_bitmap_bytes(&bytes, 2, 2, ChannelLayout::Bgra8888, &DecodeOptions::new()).unwrap();
    let m = decoded.as_packed().unwrap();
    assert_eq!(m.get(0, 0).unwrap(), (10 << 16) | (20 << 8) | 30 | (255 << 24));
    assert_eq!(m.get(0, 0).unwrap(), pack_bgra([10, 20, 30, 255]));
}

#[test]
fn test_row_region_scenario() {
    let m = Matrix::<i32>::from_fn(4, 4, |x, y| (x + 4 * y) as i32).unwrap();
    let a = m.row(2).unwrap().region(1, 0, 2, 1).unwrap();
    let b = m.region(1, 2, 2, 1).unwrap();
    assert_eq!(a.start(), b.start());
    assert_eq!(a.row_size(), b.row_size());
    assert_eq!(a.to_vec(), vec![9, 10]);
    assert_eq!(a, b);
}

#[test]
fn test_rgba_layout_round_trip_swaps_lanes() {
    // RGBA packs the second source byte into the top lane, so encoding the
    // word back out as BGRA moves it to the last position.
    let bytes = [1u8, 2, 3, 4];
    let decoded =
        decode_bitmap_bytes(&bytes, 1, 1, ChannelLayout::Rgba8888, &DecodeOptions::new()).unwrap();
    let encoded = encode_to_bitmap_bytes(&decoded);
    assert_eq!(encoded.bytes, vec![1, 4, 3, 2]);
    assert_eq!(encoded.layout, ChannelLayout::Bgra8888);
}

#[test]
fn test_unsupported_layout_tag() {
    let err = "rgb565"
        .parse::<ChannelLayout>()
        .and_then(|layout| {
            decode_bitmap_bytes(&[0, 0], 1, 1, layout, &DecodeOptions::new())
        })
        .unwrap_err();
    assert_eq!(err, MatrixError::UnsupportedChannelLayout("rgb565".to_string()));
    assert!(err.suggested_fix().is_some());
}

#[test]
fn test_channel_edges_through_fixed_point() {
    init_logging();
    // 6x6 BGRA image, bright square on the right half of the first lane
    let bytes: Vec<u8> = (0..36)
        .flat_map(|i| {
            let x = i % 6;
            let lane0 = if x >= 3 { 200 } else { 0 };
            [lane0, 0, 0, 255]
        })
        .collect();
    let decoded =
        decode_bitmap_bytes(&bytes, 6, 6, ChannelLayout::Bgra8888, &DecodeOptions::new()).unwrap();
    let lane = extract_channel(decoded.as_packed().unwrap(), PackedChannel::B0);
    let data = AnyMatrix::Int(bytes_to_fixed(&lane));

    let edges = sobel(&data, Direction::Horizontal).unwrap();
    let encoded = encode_to_bitmap_bytes(&edges);
    assert_eq!((encoded.width, encoded.height), (4, 4));
    assert_eq!(encoded.layout, ChannelLayout::Gray8);
    // 4 * 200 saturates the byte range on the edge columns
    assert_eq!(&encoded.bytes[..4], &[0, 255, 255, 0]);
}

#[test]
fn test_downscale_then_convolve() {
    let bytes = vec![64u8; 100 * 50];
    let options = DecodeOptions::new().with_max_size(20, 20);
    let decoded = decode_bitmap_bytes(&bytes, 100, 50, ChannelLayout::Gray8, &options).unwrap();
    assert_eq!(decoded.shape(), (21, 11));

    let data = AnyMatrix::Float(to_float(&decoded).unwrap());
    let blurred = gaussian_blur(&data, 5, None).unwrap();
    assert_eq!(blurred.shape(), (17, 7));
    let encoded = encode_to_bitmap_bytes(&blurred);
    assert!(encoded.bytes.iter().all(|&b| b == 64));
}

#[test]
fn test_caller_storage_sees_region_writes() {
    let store = shared(vec![0.0f32; 16]);
    let m = Matrix::from_storage(4, 4, store.clone()).unwrap();
    let result = convolve(
        &Matrix::from_vec(4, 4, vec![0.5f32; 16]).unwrap(),
        &KernelKind::Blur.float_kernel(),
    )
    .unwrap();

    m.region(1, 1, 2, 2).unwrap().copy_from(&result).unwrap();
    let cells = store.read().clone();
    assert!((cells[5] - 0.5).abs() < 1e-6);
    assert!((cells[10] - 0.5).abs() < 1e-6);
    assert_eq!(cells[0], 0.0);
}

#[test]
fn test_registry_chain_on_int_data() {
    init_logging();
    let registry = KernelRegistry::with_builtins();
    let data: AnyMatrix = Matrix::from_vec(7, 7, vec![50i32 << 16; 49]).unwrap().into();
    let result = registry
        .apply_chain(&data, &["blur", "sharpen", "laplacian"])
        .unwrap();
    assert_eq!(result.shape(), (1, 1));
    // flat input: blur keeps it (up to rounding), sharpen keeps it, laplacian zeroes it
    let value = result.as_int().unwrap().get(0, 0).unwrap();
    assert!(value.abs() < 1 << 8);
}

#[test]
fn test_kernel_kind_serde_names() {
    let json = serde_json::to_string(&KernelKind::SobelHorizontal).unwrap();
    assert_eq!(json, "\"sobel_horizontal\"");
    let layout: ChannelLayout = serde_json::from_str("\"bgra8888\"").unwrap();
    assert_eq!(layout, ChannelLayout::Bgra8888);
}
