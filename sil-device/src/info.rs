//! Strings de informação (somente leitura)
//!
//! ```text
//! SIL-Device v2026.1.16 (CUDA, 64-bit Linux, build 1a2b3c4)
//! Platform: CUDA Toolkit 6.5, Driver: 346.46
//! [0] Tesla K40c, 11520 MB, CUDA Compute 3.5
//! -1- GeForce GTX 750, 1024 MB, CUDA Compute 5.0
//! ```
//!
//! Nada aqui altera o registro.

use crate::error::DeviceResult;
use crate::platform::Platform;
use crate::registry::DeviceRegistry;

/// Nome exibido no banner
pub const LIBRARY_NAME: &str = "SIL-Device";

/// Revisão embutida pelo build.rs
pub const BUILD_REVISION: &str = env!("SIL_DEVICE_REVISION");

/// Arquitetura e sistema operacional (ex.: "64-bit Linux")
pub fn system_label() -> String {
    let os = match std::env::consts::OS {
        "linux" => "Linux",
        "windows" => "Windows",
        "macos" => "Mac OSX",
        other => other,
    };
    format!("{}-bit {}", usize::BITS, os)
}

/// Versão do runtime: 6050 → "6.5", 11020 → "11.2"
pub fn runtime_version_string(code: i32) -> String {
    format!("{}.{}", code / 1000, (code % 1000) / 10)
}

/// Versão do driver, com fallback para a versão informada pelo runtime
///
/// Vazia quando nenhum dos dois caminhos está disponível.
pub fn driver_version_string(platform: &dyn Platform) -> String {
    if let Some(version) = platform.driver_version() {
        return version;
    }

    match platform.driver_version_code() {
        Ok(code) => format!("{} Driver Version: {}", platform.backend_name(), code),
        Err(err) => {
            tracing::debug!(%err, "driver version unavailable");
            String::new()
        }
    }
}

/// Linha da plataforma: toolkit e driver
pub fn platform_info(platform: &dyn Platform) -> DeviceResult<String> {
    let runtime = runtime_version_string(platform.runtime_version()?);
    let driver = driver_version_string(platform);

    let mut info = format!("Platform: {} Toolkit {}", platform.backend_name(), runtime);
    if !driver.is_empty() {
        info.push_str(", Driver: ");
        info.push_str(&driver);
    }
    info.push('\n');
    Ok(info)
}

/// Linha de um dispositivo; o ativo aparece entre colchetes
pub fn device_info(registry: &DeviceRegistry, index: usize) -> String {
    let props = registry.properties(index);
    let id = if registry.active_index() == index {
        format!("[{}]", index)
    } else {
        format!("-{}-", index)
    };

    format!(
        "{} {}, {} MB, {} Compute {}.{}\n",
        id,
        props.name,
        props.memory_mb(),
        registry.platform().backend_name(),
        props.major,
        props.minor
    )
}

/// Banner + plataforma + uma linha por dispositivo
pub fn info(registry: &DeviceRegistry) -> DeviceResult<String> {
    let platform = registry.platform();
    let mut info = format!(
        "{} v{} ({}, {}, build {})\n",
        LIBRARY_NAME,
        env!("CARGO_PKG_VERSION"),
        platform.backend_name(),
        system_label(),
        BUILD_REVISION
    );
    info.push_str(&platform_info(platform)?);
    for index in 0..registry.device_count() {
        info.push_str(&device_info(registry, index));
    }
    Ok(info)
}
