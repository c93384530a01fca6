//! Erros do registro de dispositivos

use thiserror::Error;

/// Resultado de operações do registro de dispositivos
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Erros de descoberta, seleção e consulta de dispositivos
///
/// `Clone` é necessário: o registro global guarda a falha de inicialização
/// e a devolve em todos os acessos seguintes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeviceError {
    /// Nenhum dispositivo acelerador visível ao processo
    #[error("Nenhum dispositivo de computação encontrado")]
    NoDevice,

    /// Chamada à plataforma falhou
    #[error("Erro da plataforma em {call}: {message}")]
    Platform {
        call: &'static str,
        message: String,
    },

    /// Índice lógico fora de `[0, count)`
    #[error("Índice de dispositivo inválido: {index} (dispositivos: {count})")]
    InvalidIndex { index: i64, count: usize },

    /// Consulta de versão do driver não suportada pela plataforma
    #[error("Versão do driver indisponível")]
    DriverUnavailable,

    /// Tabela de núcleos inválida
    #[error("Tabela de núcleos inválida: {0}")]
    CoreTable(String),

    /// Configuração inválida
    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    /// Plataforma ou configuração instalada depois da inicialização
    #[error("Registro de dispositivos já inicializado")]
    AlreadyInitialized,

    /// Erro de I/O
    #[error("Erro de I/O: {0}")]
    Io(String),

    /// Erro de parsing (JSON)
    #[error("Erro de parsing: {0}")]
    Parse(String),
}

impl DeviceError {
    /// Cria erro de plataforma para a chamada `call`
    pub fn platform(call: &'static str, message: impl Into<String>) -> Self {
        Self::Platform {
            call,
            message: message.into(),
        }
    }

    /// Cria erro de índice inválido
    pub fn invalid_index(index: i64, count: usize) -> Self {
        Self::InvalidIndex { index, count }
    }
}

impl From<std::io::Error> for DeviceError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DeviceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DeviceError::platform("select_device", "invalid ordinal");
        assert!(err.to_string().contains("select_device"));
        assert!(err.to_string().contains("invalid ordinal"));

        let err = DeviceError::invalid_index(3, 3);
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "cores.json");
        let err: DeviceError = io_err.into();
        assert!(matches!(err, DeviceError::Io(msg) if msg.contains("cores.json")));
    }

    #[test]
    fn test_error_is_cloneable() {
        let err = DeviceError::NoDevice;
        assert_eq!(err.clone(), err);
    }
}
