//! # Registro global do processo
//!
//! Um único [`DeviceRegistry`] por processo, criado de forma preguiçosa no
//! primeiro acesso a qualquer função deste módulo. A inicialização roda
//! exatamente uma vez, mesmo com várias threads disputando o primeiro acesso.
//!
//! Se a inicialização falhar, o erro fica guardado e todo acesso seguinte
//! devolve o mesmo erro, sem nova tentativa.
//!
//! ## Plataforma e configuração
//!
//! [`install_platform`] e [`install_config`] devem ser chamadas antes do
//! primeiro acesso. Sem plataforma instalada, usa-se a
//! [`SimulatedPlatform`] descrita por `SIL_DEVICE_SIM_FILE` (sem o arquivo,
//! nenhum dispositivo é encontrado). Sem configuração instalada, usa-se
//! [`RegistryConfig::from_env`].
//!
//! ## Índices
//!
//! As funções `get_*`/`set_device` mantêm o contrato de sentinela: índice
//! inválido resulta em `Ok(-1)`, não em erro. `Err` fica reservado para falha
//! de inicialização e de chamadas à plataforma.
//!
//! ```ignore
//! use sil_device::global;
//!
//! let count = global::get_device_count()?;
//! let previous = global::set_device(1)?;
//! // ... operações no dispositivo 1 ...
//! global::set_device(previous)?;
//! ```

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use crate::config::RegistryConfig;
use crate::error::{DeviceError, DeviceResult};
use crate::info;
use crate::platform::Platform;
use crate::properties::DeviceProperties;
use crate::ranking::RankingPolicy;
use crate::registry::DeviceRegistry;
use crate::simulated::SimulatedPlatform;

/// Plataforma e configuração instaladas antes do primeiro acesso
struct Installed {
    platform: Option<Arc<dyn Platform>>,
    config: Option<RegistryConfig>,
    // Fechado quando a inicialização lê os valores instalados
    sealed: bool,
}

static INSTALLED: Mutex<Installed> = Mutex::new(Installed {
    platform: None,
    config: None,
    sealed: false,
});
static REGISTRY: OnceLock<Result<Mutex<DeviceRegistry>, DeviceError>> = OnceLock::new();

fn installed() -> MutexGuard<'static, Installed> {
    INSTALLED.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Instala a plataforma usada na inicialização
///
/// Verificação e instalação acontecem sob o mesmo lock que a inicialização
/// usa para ler a plataforma, então um `Ok` garante que ela será usada.
///
/// # Errors
///
/// `DeviceError::AlreadyInitialized` se a inicialização já começou ou outra
/// plataforma já foi instalada.
pub fn install_platform(platform: Arc<dyn Platform>) -> DeviceResult<()> {
    let mut installed = installed();
    if installed.sealed || installed.platform.is_some() {
        return Err(DeviceError::AlreadyInitialized);
    }
    installed.platform = Some(platform);
    Ok(())
}

/// Instala a configuração usada na inicialização
pub fn install_config(config: RegistryConfig) -> DeviceResult<()> {
    let mut installed = installed();
    if installed.sealed || installed.config.is_some() {
        return Err(DeviceError::AlreadyInitialized);
    }
    installed.config = Some(config);
    Ok(())
}

fn initialize() -> DeviceResult<Mutex<DeviceRegistry>> {
    let (platform, config) = {
        let mut installed = installed();
        installed.sealed = true;
        (installed.platform.clone(), installed.config.clone())
    };

    let config = config.unwrap_or_else(RegistryConfig::from_env);
    let platform: Arc<dyn Platform> = match platform {
        Some(platform) => platform,
        None => Arc::new(SimulatedPlatform::from_env()?),
    };

    DeviceRegistry::initialize(platform, &config)
        .map(Mutex::new)
        .inspect_err(|err| tracing::error!(%err, "device registry initialization failed"))
}

/// Acesso ao registro global (inicializa no primeiro uso)
///
/// O guard serializa o acesso; não chame outras funções deste módulo
/// enquanto o mantiver.
pub fn registry() -> DeviceResult<MutexGuard<'static, DeviceRegistry>> {
    match REGISTRY.get_or_init(initialize) {
        Ok(registry) => Ok(registry.lock().unwrap_or_else(PoisonError::into_inner)),
        Err(err) => Err(err.clone()),
    }
}

/// Registro criado com sucesso
pub fn is_initialized() -> bool {
    matches!(REGISTRY.get(), Some(Ok(_)))
}

#[inline]
fn logical(index: i32) -> Option<usize> {
    usize::try_from(index).ok()
}

#[inline]
fn to_i32(value: usize) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// Número de dispositivos
pub fn get_device_count() -> DeviceResult<i32> {
    Ok(to_i32(registry()?.device_count()))
}

/// Índice lógico do dispositivo ativo
pub fn get_active_device_id() -> DeviceResult<i32> {
    Ok(to_i32(registry()?.active_index()))
}

/// Índice nativo do dispositivo lógico `index`, `-1` se fora do intervalo
pub fn get_device_native_id(index: i32) -> DeviceResult<i32> {
    let registry = registry()?;
    Ok(logical(index)
        .and_then(|index| registry.native_id(index))
        .map_or(-1, to_i32))
}

/// Seleciona o dispositivo lógico `index`
///
/// Retorna o índice ativo anterior, ou `-1` (sem alteração) se `index` está
/// fora de `[0, count)`.
pub fn set_device(index: i32) -> DeviceResult<i32> {
    let mut registry = registry()?;
    let Some(index) = logical(index) else {
        return Ok(-1);
    };

    match registry.set_active(index) {
        Ok(previous) => Ok(to_i32(previous)),
        Err(DeviceError::InvalidIndex { .. }) => Ok(-1),
        Err(err) => Err(err),
    }
}

/// Propriedades do dispositivo lógico `index`
///
/// Fora do intervalo devolve as propriedades do dispositivo 0.
pub fn get_device_properties(index: i32) -> DeviceResult<DeviceProperties> {
    let registry = registry()?;
    let index = logical(index).unwrap_or(usize::MAX);
    Ok(registry.properties(index).clone())
}

/// Reordena os dispositivos; índices lógicos anteriores ficam inválidos
pub fn rank_devices(policy: RankingPolicy) -> DeviceResult<()> {
    registry()?.rank(policy)
}

/// Banner, plataforma e todos os dispositivos
pub fn get_info() -> DeviceResult<String> {
    let registry = registry()?;
    info::info(&registry)
}

/// Linha do dispositivo lógico `index`
///
/// # Errors
///
/// `DeviceError::InvalidIndex` para índice negativo.
pub fn get_device_info(index: i32) -> DeviceResult<String> {
    let registry = registry()?;
    let Some(logical_index) = logical(index) else {
        return Err(DeviceError::invalid_index(i64::from(index), registry.device_count()));
    };
    Ok(info::device_info(&registry, logical_index))
}

/// Linha da plataforma (toolkit e driver)
pub fn get_platform_info() -> DeviceResult<String> {
    info::platform_info(registry()?.platform())
}
