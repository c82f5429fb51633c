#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use scatlet::{BiortFamily, BorderMode, ImageTensor, ScatConfig, Scatlet};

#[derive(Arbitrary, Debug)]
struct Data {
    height: u8,
    width: u8,
    channels: u8,
    family: u8,
    zero_border: bool,
}

fuzz_target!(|data: Data| {
    if data.height < 2 || data.width < 2 {
        return;
    }
    if data.channels == 0 || data.channels > 4 {
        return;
    }
    let (h, w, c) = (
        data.height as usize,
        data.width as usize,
        data.channels as usize,
    );
    let config = ScatConfig {
        biort: match data.family % 2 {
            0 => BiortFamily::LeGall53,
            _ => BiortFamily::Cdf97,
        },
        border_mode: if data.zero_border {
            BorderMode::Zero
        } else {
            BorderMode::Replicate
        },
        ..ScatConfig::default()
    };
    let mut image = vec![0.; c * h * w];
    for i in 0..image.len() {
        image[i] = i as f32 / image.len() as f32;
    }
    let x = ImageTensor::new(image, 1, c, h, w).unwrap();
    let executor = Scatlet::make_order1_f32(&config).unwrap();
    let (y, ctx) = executor.forward_with_grad(&x).unwrap();
    let grad = executor.backward(ctx, &y).unwrap();
    assert!(grad.data.iter().all(|v| v.is_finite()));
});
