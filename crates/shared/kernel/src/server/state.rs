use axum::extract::FromRef;
use roster_domain::config::ApiConfig;
use roster_registration::AdmissionGate;
use std::borrow::Cow;
use std::ops::Deref;
use std::sync::Arc;

#[roster_derive::roster_error]
pub enum ApiStateError {
    #[error("State validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

#[derive(Debug)]
pub struct ApiStateInner {
    pub config: ApiConfig,
    pub gate: AdmissionGate,
}

/// State shared by every HTTP handler.
#[derive(Debug, Clone)]
pub struct ApiState {
    inner: Arc<ApiStateInner>,
}

impl ApiState {
    #[must_use]
    pub fn builder() -> ApiStateBuilder {
        ApiStateBuilder::default()
    }
}

impl Deref for ApiState {
    type Target = ApiStateInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FromRef<ApiState> for ApiConfig {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.config.clone()
    }
}

impl FromRef<ApiState> for AdmissionGate {
    fn from_ref(state: &ApiState) -> Self {
        state.inner.gate.clone()
    }
}

#[derive(Debug, Default)]
pub struct ApiStateBuilder {
    config: Option<ApiConfig>,
    gate: Option<AdmissionGate>,
}

impl ApiStateBuilder {
    #[must_use]
    pub fn config(mut self, config: ApiConfig) -> Self {
        self.config = Some(config);
        self
    }

    #[must_use]
    pub fn gate(mut self, gate: AdmissionGate) -> Self {
        self.gate = Some(gate);
        self
    }

    /// # Errors
    /// [`ApiStateError::Validation`] if the admission gate was not provided.
    pub fn build(self) -> Result<ApiState, ApiStateError> {
        let gate = self.gate.ok_or_else(|| ApiStateError::Validation {
            message: "AdmissionGate not provided".into(),
            context: None,
        })?;
        let config = self.config.unwrap_or_default();

        Ok(ApiState { inner: Arc::new(ApiStateInner { config, gate }) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_store::MemoryRegistrantStore;

    #[test]
    fn build_requires_gate() {
        let err = ApiState::builder().config(ApiConfig::default()).build().unwrap_err();
        assert!(matches!(err, ApiStateError::Validation { .. }));
    }

    #[test]
    fn gate_is_extractable_from_state() {
        let gate = AdmissionGate::new(Arc::new(MemoryRegistrantStore::new()), 7);
        let state = ApiState::builder().gate(gate).build().unwrap();

        assert_eq!(AdmissionGate::from_ref(&state).capacity(), 7);
        assert_eq!(ApiConfig::from_ref(&state).registration.capacity, 20);
    }
}
