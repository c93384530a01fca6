//! Superfície da plataforma aceleradora consumida pelo registro
//!
//! O registro não conhece o driver: enumeração, consulta de propriedades,
//! troca de contexto e versões chegam por este trait. Todas as chamadas são
//! síncronas e podem falhar com [`DeviceError::Platform`](crate::DeviceError).

use crate::error::DeviceResult;
use crate::properties::DeviceProperties;

/// Plataforma aceleradora (driver + runtime)
///
/// Implementações guardam o próprio estado com mutabilidade interior: o
/// registro compartilha a plataforma via `Arc` e chama `select_device`
/// a partir de `&self`.
pub trait Platform: Send + Sync {
    /// Nome do backend (ex.: "CUDA")
    fn backend_name(&self) -> &str;

    /// Número de dispositivos visíveis ao processo
    fn device_count(&self) -> DeviceResult<usize>;

    /// Propriedades do dispositivo com índice nativo `native_id`
    fn device_properties(&self, native_id: usize) -> DeviceResult<DeviceProperties>;

    /// Torna `native_id` o dispositivo corrente do contexto da plataforma
    fn select_device(&self, native_id: usize) -> DeviceResult<()>;

    /// Versão do driver pelo caminho rápido; `None` quando não suportado
    fn driver_version(&self) -> Option<String>;

    /// Versão do driver informada pelo runtime (caminho alternativo)
    fn driver_version_code(&self) -> DeviceResult<i32>;

    /// Versão do runtime/toolkit (ex.: 6050 para 6.5)
    fn runtime_version(&self) -> DeviceResult<i32>;
}
