#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scatlet::{BiortFamily, BorderMode, ImageTensor, QshiftFamily, ScatConfig, Scatlet};

#[derive(Arbitrary, Debug)]
struct Data {
    height: u8,
    width: u8,
    channels: u8,
    family: u8,
    zero_border: bool,
    combine_colour: bool,
}

fuzz_target!(|data: Data| {
    // Boundary extension to a multiple of 8 replicates at most 4
    // rows/columns on one side.
    if data.height < 4 || data.width < 4 {
        return;
    }
    if data.channels == 0 || data.channels > 4 {
        return;
    }
    if data.combine_colour && data.channels != 3 {
        return;
    }
    let (h, w, c) = (
        data.height as usize,
        data.width as usize,
        data.channels as usize,
    );
    let (biort, qshift) = match data.family % 3 {
        0 => (BiortFamily::LeGall53, QshiftFamily::Qshift10),
        1 => (BiortFamily::Cdf97, QshiftFamily::Qshift14),
        _ => (BiortFamily::Cdf97Bp, QshiftFamily::Qshift14Bp),
    };
    let config = ScatConfig {
        biort,
        qshift,
        border_mode: if data.zero_border {
            BorderMode::Zero
        } else {
            BorderMode::Replicate
        },
        combine_colour: data.combine_colour,
        ..ScatConfig::default()
    };
    let mut image = vec![0.; c * h * w];
    for i in 0..image.len() {
        image[i] = i as f64 / image.len() as f64;
    }
    let x = ImageTensor::new(image, 1, c, h, w).unwrap();
    let executor = Scatlet::make_order2_f64(&config).unwrap();
    let (y, ctx) = executor.forward_with_grad(&x).unwrap();
    let grad = executor.backward(ctx, &y).unwrap();
    assert!(grad.height == h && grad.width == w);
    assert!(grad.data.iter().all(|v| v.is_finite()));
});
