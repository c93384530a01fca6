//! # 🎛️ SIL-Device — Registro de Dispositivos Aceleradores
//!
//! Substrato de seleção de dispositivo para o runtime numérico: descobre os
//! aceleradores visíveis ao processo, calcula um score por dispositivo, ordena
//! a lista segundo uma política e mantém o **dispositivo ativo** que recebe
//! implicitamente as operações de computação seguintes.
//!
//! ## Arquitetura
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     global (OnceLock + Mutex)                   │
//! │  get_device_count | set_device | get_device_properties | info  │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        DeviceRegistry                           │
//! │  devices: [DeviceDescriptor] (ordem lógica) | active | policy  │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │  CoreTable   │  │RankingPolicy │  │  DeviceDescriptor    │  │
//! │  │ (major,minor)│  │ generation / │  │ native_id, props,    │  │
//! │  │  → núcleos   │  │ flops / mem /│  │ flops                │  │
//! │  │              │  │ identity     │  │                      │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────────┘  │
//! └──────────────────────────────┬──────────────────────────────────┘
//!                                ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                   Platform (trait)                              │
//! │  device_count | device_properties | select_device | versões    │
//! │  SimulatedPlatform (testes/CI) | drivers reais (externos)      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fluxo
//!
//! 1. Primeiro acesso ao registro global → enumeração da plataforma
//! 2. Cada dispositivo recebe `flops = unidades × núcleos/unidade × clock`
//! 3. A política padrão (`identity`) ordena a lista
//! 4. O índice lógico 0 vira o dispositivo ativo
//!
//! ## Uso
//!
//! ```
//! use std::sync::Arc;
//! use sil_device::{DeviceProperties, DeviceRegistry, RankingPolicy, SimulatedPlatform};
//!
//! let platform = Arc::new(
//!     SimulatedPlatform::new()
//!         .with_device(DeviceProperties::new("Kepler", 4 << 30, 3, 5).with_compute_units(15))
//!         .with_device(DeviceProperties::new("Maxwell", 2 << 30, 5, 0).with_compute_units(16)),
//! );
//!
//! let mut registry = DeviceRegistry::with_defaults(platform)?;
//! assert_eq!(registry.device_count(), 2);
//!
//! let previous = registry.set_active(1)?;
//! assert_eq!(previous, 0);
//!
//! registry.rank(RankingPolicy::Generation)?;
//! assert_eq!(registry.devices()[0].name(), "Maxwell");
//! # Ok::<(), sil_device::DeviceError>(())
//! ```

pub mod config;
pub mod cores;
pub mod descriptor;
pub mod error;
pub mod global;
pub mod info;
pub mod platform;
pub mod properties;
pub mod ranking;
pub mod registry;
pub mod simulated;

// Re-exports
pub use config::RegistryConfig;
pub use cores::{CoreEntry, CoreTable, cores_per_unit, generation_code};
pub use descriptor::{DeviceDescriptor, flops_score};
pub use error::{DeviceError, DeviceResult};
pub use global::{
    get_active_device_id, get_device_count, get_device_info, get_device_native_id,
    get_device_properties, get_info, get_platform_info, rank_devices, set_device,
};
pub use platform::Platform;
pub use properties::{DeviceProperties, MIB, memory_mb};
pub use ranking::RankingPolicy;
pub use registry::DeviceRegistry;
pub use simulated::{SimulatedConfig, SimulatedPlatform};
