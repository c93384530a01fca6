//! Primeiro acesso disputado por várias threads: descoberta exatamente uma vez

use std::sync::{Arc, Barrier};
use std::thread;

use sil_device::global;
use sil_device::*;

#[test]
fn test_racing_first_access_initializes_once() {
    let platform = Arc::new(
        SimulatedPlatform::new()
            .with_device(DeviceProperties::new("A", 1024 * MIB, 3, 5))
            .with_device(DeviceProperties::new("B", 2048 * MIB, 5, 0)),
    );
    global::install_platform(platform.clone()).unwrap();
    global::install_config(RegistryConfig::default().with_policy(RankingPolicy::Memory)).unwrap();

    let threads = 8;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                get_device_count()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(2));
    }

    assert_eq!(platform.enumerations(), 1);
    assert_eq!(platform.select_calls(), 1);
    // Política configurada: mais memória primeiro
    assert_eq!(get_device_native_id(0).unwrap(), 1);
    assert_eq!(platform.selected_native_id(), Some(1));
}
