//! Registro global sem dispositivos: a falha é fatal e persistente

use std::sync::Arc;

use sil_device::global;
use sil_device::*;

#[test]
fn test_zero_devices_fails_every_access() {
    let platform = Arc::new(SimulatedPlatform::new());
    global::install_platform(platform.clone()).unwrap();

    assert_eq!(get_device_count(), Err(DeviceError::NoDevice));
    assert!(!global::is_initialized());

    // Mesmo erro em todo acesso seguinte, sem nova enumeração
    assert_eq!(get_active_device_id(), Err(DeviceError::NoDevice));
    assert_eq!(set_device(0), Err(DeviceError::NoDevice));
    assert_eq!(get_device_native_id(0), Err(DeviceError::NoDevice));
    assert!(get_device_properties(0).is_err());
    assert!(get_info().is_err());
    assert!(global::registry().is_err());
    assert_eq!(platform.enumerations(), 1);

    // Não é possível trocar a plataforma depois da falha
    assert_eq!(
        global::install_platform(Arc::new(SimulatedPlatform::new())),
        Err(DeviceError::AlreadyInitialized)
    );
}
