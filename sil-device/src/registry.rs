//! # Registro de dispositivos
//!
//! Dono da lista de dispositivos descobertos e do índice do dispositivo ativo.
//!
//! ## Ciclo de vida
//!
//! 1. [`DeviceRegistry::initialize`] enumera a plataforma, consulta as
//!    propriedades de cada índice nativo e calcula o score de cada um
//! 2. A política padrão ordena a lista (índice lógico ≠ índice nativo)
//! 3. O dispositivo lógico inicial é selecionado na plataforma
//!
//! A construção é tudo-ou-nada: qualquer falha da plataforma aborta a
//! inicialização e nenhum registro parcial é produzido.
//!
//! ## Contrato de índices
//!
//! Índices lógicos são posições na lista ranqueada. [`DeviceRegistry::rank`]
//! permuta a lista, então um índice guardado antes do ranking pode passar a
//! denotar outro dispositivo físico. Para identidade estável use
//! [`DeviceDescriptor::native_id`].
//!
//! ## Concorrência
//!
//! `set_active` e `rank` exigem `&mut self`. O registro global serializa o
//! acesso com um mutex; quem mantém um registro próprio compartilhado entre
//! threads é responsável pela sincronização.

use std::sync::Arc;

use crate::config::RegistryConfig;
use crate::cores::CoreTable;
use crate::descriptor::DeviceDescriptor;
use crate::error::{DeviceError, DeviceResult};
use crate::platform::Platform;
use crate::properties::DeviceProperties;
use crate::ranking::RankingPolicy;

/// Registro de dispositivos aceleradores
pub struct DeviceRegistry {
    platform: Arc<dyn Platform>,
    devices: Vec<DeviceDescriptor>,
    active: usize,
    policy: RankingPolicy,
}

impl std::fmt::Debug for DeviceRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceRegistry")
            .field("backend", &self.platform.backend_name())
            .field("devices", &self.devices)
            .field("active", &self.active)
            .field("policy", &self.policy)
            .finish()
    }
}

impl DeviceRegistry {
    /// Descobre, ranqueia e seleciona o dispositivo inicial
    ///
    /// # Errors
    ///
    /// * `DeviceError::NoDevice` - a plataforma não enumerou nenhum dispositivo
    /// * `DeviceError::Platform` - enumeração, consulta ou seleção falhou
    /// * `DeviceError::Io`/`Parse`/`CoreTable` - tabela de núcleos configurada inválida
    pub fn initialize(platform: Arc<dyn Platform>, config: &RegistryConfig) -> DeviceResult<Self> {
        let cores = config.core_table()?;
        Self::initialize_with_cores(platform, config, &cores)
    }

    /// Inicializa com configuração padrão
    pub fn with_defaults(platform: Arc<dyn Platform>) -> DeviceResult<Self> {
        Self::initialize(platform, &RegistryConfig::default())
    }

    /// Inicializa com uma tabela de núcleos explícita
    pub fn initialize_with_cores(
        platform: Arc<dyn Platform>,
        config: &RegistryConfig,
        cores: &CoreTable,
    ) -> DeviceResult<Self> {
        let count = platform.device_count()?;
        if count == 0 {
            tracing::warn!(backend = platform.backend_name(), "no compute devices found");
            return Err(DeviceError::NoDevice);
        }

        let mut devices = Vec::with_capacity(count);
        for native_id in 0..count {
            let properties = platform.device_properties(native_id)?;
            let descriptor = DeviceDescriptor::new(native_id, properties, cores);
            tracing::debug!(
                native_id,
                name = descriptor.name(),
                major = descriptor.properties().major,
                minor = descriptor.properties().minor,
                flops = descriptor.flops(),
                "device discovered"
            );
            devices.push(descriptor);
        }

        config.default_policy.sort(&mut devices);

        let mut active = config.default_device;
        if active >= count {
            tracing::warn!(
                requested = active,
                count,
                "default device out of range, using device 0"
            );
            active = 0;
        }

        platform.select_device(devices[active].native_id())?;

        tracing::info!(
            backend = platform.backend_name(),
            count,
            policy = %config.default_policy,
            active,
            native_id = devices[active].native_id(),
            "device registry initialized"
        );

        Ok(Self {
            platform,
            devices,
            active,
            policy: config.default_policy,
        })
    }

    /// Número de dispositivos
    #[inline]
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Índice lógico do dispositivo ativo
    #[inline]
    pub fn active_index(&self) -> usize {
        self.active
    }

    /// Descritor do dispositivo ativo
    #[inline]
    pub fn active_device(&self) -> &DeviceDescriptor {
        &self.devices[self.active]
    }

    /// Índice nativo do dispositivo lógico `index`, `None` se fora do intervalo
    pub fn native_id(&self, index: usize) -> Option<usize> {
        self.devices.get(index).map(DeviceDescriptor::native_id)
    }

    pub fn descriptor(&self, index: usize) -> Option<&DeviceDescriptor> {
        self.devices.get(index)
    }

    /// Lista na ordem lógica atual
    pub fn devices(&self) -> &[DeviceDescriptor] {
        &self.devices
    }

    /// Propriedades do dispositivo lógico `index`
    ///
    /// Fora do intervalo, devolve as propriedades do índice 0. Comportamento
    /// mantido por compatibilidade; use [`try_properties`](Self::try_properties)
    /// para a consulta estrita.
    pub fn properties(&self, index: usize) -> &DeviceProperties {
        match self.devices.get(index) {
            Some(device) => device.properties(),
            None => {
                tracing::debug!(
                    index,
                    count = self.devices.len(),
                    "properties fallback to device 0"
                );
                self.devices[0].properties()
            }
        }
    }

    /// Propriedades do dispositivo lógico `index`, erro se fora do intervalo
    pub fn try_properties(&self, index: usize) -> DeviceResult<&DeviceProperties> {
        self.devices
            .get(index)
            .map(DeviceDescriptor::properties)
            .ok_or_else(|| DeviceError::invalid_index(index as i64, self.devices.len()))
    }

    /// Torna `index` o dispositivo ativo; retorna o índice ativo anterior
    ///
    /// A plataforma recebe o índice nativo do dispositivo nessa posição lógica.
    /// Índice fora de `[0, count)` não altera nada.
    ///
    /// # Errors
    ///
    /// * `DeviceError::InvalidIndex` - índice fora do intervalo
    /// * `DeviceError::Platform` - troca de contexto falhou (estado inalterado)
    pub fn set_active(&mut self, index: usize) -> DeviceResult<usize> {
        let Some(device) = self.devices.get(index) else {
            return Err(DeviceError::invalid_index(index as i64, self.devices.len()));
        };

        self.platform.select_device(device.native_id())?;

        let previous = self.active;
        self.active = index;
        tracing::debug!(
            previous,
            active = index,
            native_id = device.native_id(),
            "active device changed"
        );
        Ok(previous)
    }

    /// Executa `f` com `index` ativo e restaura o dispositivo anterior
    pub fn with_active<R>(
        &mut self,
        index: usize,
        f: impl FnOnce(&mut Self) -> R,
    ) -> DeviceResult<R> {
        let previous = self.set_active(index)?;
        let result = f(self);
        self.set_active(previous)?;
        Ok(result)
    }

    /// Reordena a lista com `policy`
    ///
    /// O valor numérico do índice ativo é mantido; o dispositivo nessa posição
    /// após a permutação é selecionado na plataforma, então o dispositivo
    /// físico ativo pode mudar. Índices lógicos obtidos antes ficam inválidos.
    ///
    /// # Errors
    ///
    /// * `DeviceError::Platform` - troca de contexto falhou (ordem e política inalteradas)
    pub fn rank(&mut self, policy: RankingPolicy) -> DeviceResult<()> {
        let before = self.devices[self.active].native_id();
        let mut ranked = self.devices.clone();
        policy.sort(&mut ranked);

        let after = ranked[self.active].native_id();
        if after != before {
            self.platform.select_device(after)?;
        }

        self.devices = ranked;
        self.policy = policy;
        tracing::debug!(%policy, active = self.active, native_id = after, "devices ranked");
        Ok(())
    }

    /// Última política aplicada
    #[inline]
    pub fn policy(&self) -> RankingPolicy {
        self.policy
    }

    pub fn platform(&self) -> &dyn Platform {
        self.platform.as_ref()
    }
}
