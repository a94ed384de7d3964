//! End-to-end two-party runs of the extension protocol.

use std::os::unix::net::UnixStream;

use otx_core::Block;
use otx_ot::iknp::{self, PublicParams};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

#[test]
fn test_extension_with_persisted_params() {
    let path = std::env::temp_dir().join(format!("otx-ote-e2e-{}.bin", std::process::id()));
    iknp::setup().save(&path).unwrap();

    // Each party loads its own copy of the parameters from disk.
    let sender_pp = PublicParams::load(&path).unwrap();
    let receiver_pp = PublicParams::load(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(sender_pp, receiver_pp);

    let mut rng = ChaCha12Rng::seed_from_u64(42);
    let count = 2048;
    let m0 = Block::random_vec(&mut rng, count);
    let m1 = Block::random_vec(&mut rng, count);
    let choices: Vec<bool> = (0..count).map(|_| rng.gen()).collect();

    let (mut sender_io, mut receiver_io) = UnixStream::pair().unwrap();

    let (sender_m0, sender_m1) = (m0.clone(), m1.clone());
    let handle = std::thread::spawn(move || {
        iknp::send(&mut sender_io, &sender_pp, &sender_m0, &sender_m1)
    });

    let result = iknp::receive(&mut receiver_io, &receiver_pp, &choices).unwrap();
    handle.join().unwrap().unwrap();

    for ((result, choice), (m0, m1)) in result.iter().zip(choices).zip(m0.iter().zip(&m1)) {
        assert_eq!(*result, if choice { *m1 } else { *m0 });
    }
}

#[test]
fn test_one_sided_extension_end_to_end() {
    let pp = iknp::setup();

    let mut rng = ChaCha12Rng::seed_from_u64(7);
    let count = 512;
    let m = Block::random_vec(&mut rng, count);
    let choices: Vec<bool> = (0..count).map(|_| rng.gen()).collect();

    let (mut sender_io, mut receiver_io) = UnixStream::pair().unwrap();

    let sender_m = m.clone();
    let handle =
        std::thread::spawn(move || iknp::one_sided_send(&mut sender_io, &pp, &sender_m));

    let result = iknp::one_sided_receive(&mut receiver_io, &pp, &choices).unwrap();
    handle.join().unwrap().unwrap();

    let expected: Vec<Block> = m
        .iter()
        .zip(&choices)
        .filter(|(_, &choice)| choice)
        .map(|(m, _)| *m)
        .collect();

    assert_eq!(result, expected);
}
