use eegload::reference::{average_reference_inplace, channel_reference_inplace};
use eegload::{EegError, Recording, Reference};
use ndarray::{Array2, Axis};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn signal(n_times: usize, n_ch: usize) -> Array2<f32> {
    Array2::from_shape_fn((n_times, n_ch), |(t, c)| {
        ((t as f32 * 0.05 * (c + 1) as f32).sin() + c as f32) * 20.0
    })
}

#[test]
fn average_reference_zero_channel_sum() {
    let mut data = signal(1000, 19);
    average_reference_inplace(&mut data);
    let sums = data.sum_axis(Axis(1));
    for (t, &s) in sums.iter().enumerate() {
        assert!(s.abs() < 1e-3, "sample {t} channel sum = {s:.2e} after average reference");
    }
}

#[test]
fn average_reference_returns_mean_waveform() {
    let orig = signal(200, 5);
    let mut data = orig.clone();
    let avg = average_reference_inplace(&mut data);
    assert_eq!(avg.len(), 200);
    for t in 0..200 {
        approx::assert_abs_diff_eq!(avg[t], orig.row(t).mean().unwrap(), epsilon = 1e-4);
        approx::assert_abs_diff_eq!(data[[t, 3]] + avg[t], orig[[t, 3]], epsilon = 1e-3);
    }
}

#[test]
fn cz_reference_zeroes_cz() {
    let orig = signal(300, 4);
    let mut data = orig.clone();
    let idx = channel_reference_inplace(&mut data, &names(&["Fp1", "CZ", "O1", "O2"]), &["Cz", "CZ"]).unwrap();
    assert_eq!(idx, 1);
    assert!(data.column(1).iter().all(|&v| v == 0.0));
    for t in 0..300 {
        approx::assert_abs_diff_eq!(data[[t, 2]], orig[[t, 2]] - orig[[t, 1]], epsilon = 1e-5);
    }
}

#[test]
fn recording_rereference_dispatch() {
    let mut rec = Recording::new(signal(100, 3), 100.0, names(&["Fp1", "Cz", "Pz"])).unwrap();
    assert!(rec.rereference(Reference::Cz).unwrap().is_none());
    assert!(rec.samples.column(1).iter().all(|&v| v == 0.0));
    assert_eq!(rec.channels, names(&["Fp1", "Cz", "Pz"]));

    let mut rec = Recording::new(signal(100, 3), 100.0, names(&["Fp1", "Cz", "Pz"])).unwrap();
    let avg = rec.rereference(Reference::Average).unwrap().unwrap();
    assert_eq!(avg.len(), 100);
}

#[test]
fn missing_cz_is_reported() {
    let mut rec = Recording::new(signal(10, 2), 100.0, names(&["Fp1", "Pz"])).unwrap();
    assert!(matches!(
        rec.rereference(Reference::Cz),
        Err(EegError::ReferenceChannelNotFound(_))
    ));
}

#[test]
fn reference_mode_parsing() {
    assert_eq!("avg".parse::<Reference>().unwrap(), Reference::Average);
    assert_eq!("Cz".parse::<Reference>().unwrap(), Reference::Cz);
    assert!(matches!("mastoid".parse::<Reference>(), Err(EegError::InvalidParameter(_))));
}
