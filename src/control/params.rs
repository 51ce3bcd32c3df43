//! Live control parameters.
//!
//! A parameter always has a value, whether or not anything is playing. While
//! a session is live it is also bound to the node property it drives, and
//! writes are forwarded there as well.

use std::{ops::RangeInclusive, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::DroneError,
    graph::{NodeId, ParamKind},
};

/// The six user-facing controls.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamName {
    ToneGain,
    ModulatorARate,
    ModulatorADepth,
    NoiseGain,
    ModulatorBRate,
    ModulatorBDepth,
}

impl ParamName {
    pub const ALL: [ParamName; 6] = [
        ParamName::ToneGain,
        ParamName::ModulatorARate,
        ParamName::ModulatorADepth,
        ParamName::NoiseGain,
        ParamName::ModulatorBRate,
        ParamName::ModulatorBDepth,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ParamName::ToneGain => "tone-gain",
            ParamName::ModulatorARate => "modulator-a-rate",
            ParamName::ModulatorADepth => "modulator-a-depth",
            ParamName::NoiseGain => "noise-gain",
            ParamName::ModulatorBRate => "modulator-b-rate",
            ParamName::ModulatorBDepth => "modulator-b-depth",
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamName::ToneGain => 0.25,
            ParamName::ModulatorARate => 0.2,
            ParamName::ModulatorADepth => 0.08,
            ParamName::NoiseGain => 0.1,
            ParamName::ModulatorBRate => 0.10,
            ParamName::ModulatorBDepth => 0.005,
        }
    }

    /// Accepted values, inclusive
    pub fn range(self) -> RangeInclusive<f32> {
        match self {
            ParamName::ModulatorARate | ParamName::ModulatorBRate => 0.01..=5.0,
            _ => 0.0..=1.0,
        }
    }

    /// The node property this control drives
    pub fn kind(self) -> ParamKind {
        match self {
            ParamName::ToneGain | ParamName::NoiseGain => ParamKind::Gain,
            ParamName::ModulatorARate | ParamName::ModulatorBRate => ParamKind::Rate,
            ParamName::ModulatorADepth | ParamName::ModulatorBDepth => ParamKind::Depth,
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    pub fn validate(self, value: f32) -> Result<(), DroneError> {
        let range = self.range();
        if !value.is_finite() || !range.contains(&value) {
            return Err(DroneError::invalid(
                "value",
                format!(
                    "{} must be within {}..={}, got {}",
                    self,
                    range.start(),
                    range.end(),
                    value
                ),
            ));
        }
        Ok(())
    }
}

impl std::fmt::Display for ParamName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParamName {
    type Err = DroneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParamName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| DroneError::UnknownParameter(s.to_string()))
    }
}

/// A live node property a parameter is forwarded to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamBinding {
    pub node: NodeId,
    pub param: ParamKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AudioParameter {
    name: ParamName,
    value: f32,
    binding: Option<ParamBinding>,
}

impl AudioParameter {
    pub fn new(name: ParamName) -> Self {
        Self {
            name,
            value: name.default_value(),
            binding: None,
        }
    }

    pub fn name(&self) -> ParamName {
        self.name
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn binding(&self) -> Option<ParamBinding> {
        self.binding
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    pub(crate) fn store(&mut self, value: f32) {
        self.value = value;
    }

    pub(crate) fn bind(&mut self, binding: ParamBinding) {
        self.binding = Some(binding);
    }

    pub(crate) fn unbind(&mut self) {
        self.binding = None;
    }
}

/// All six parameters, indexed by name
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSet {
    params: [AudioParameter; 6],
}

impl ParameterSet {
    pub fn new() -> Self {
        Self {
            params: ParamName::ALL.map(AudioParameter::new),
        }
    }

    pub fn get(&self, name: ParamName) -> &AudioParameter {
        &self.params[name.index()]
    }

    pub(crate) fn get_mut(&mut self, name: ParamName) -> &mut AudioParameter {
        &mut self.params[name.index()]
    }

    pub fn value(&self, name: ParamName) -> f32 {
        self.get(name).value()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AudioParameter> {
        self.params.iter()
    }

    pub(crate) fn bind_all(&mut self, binding: impl Fn(ParamName) -> ParamBinding) {
        for param in &mut self.params {
            param.bind(binding(param.name));
        }
    }

    pub(crate) fn unbind_all(&mut self) {
        for param in &mut self.params {
            param.unbind();
        }
    }
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_strings() {
        for name in ParamName::ALL {
            assert_eq!(name.as_str().parse::<ParamName>(), Ok(name));
        }
        assert_eq!(
            "unknown-x".parse::<ParamName>(),
            Err(DroneError::UnknownParameter("unknown-x".into()))
        );
    }

    #[test]
    fn defaults_are_in_range() {
        for name in ParamName::ALL {
            assert!(name.validate(name.default_value()).is_ok(), "{}", name);
        }
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(ParamName::ToneGain.validate(1.5).is_err());
        assert!(ParamName::ToneGain.validate(-0.1).is_err());
        assert!(ParamName::ModulatorARate.validate(0.0).is_err());
        assert!(ParamName::ModulatorARate.validate(5.0).is_ok());
        assert!(ParamName::NoiseGain.validate(f32::NAN).is_err());
        assert!(ParamName::ModulatorBDepth
            .validate(f32::INFINITY)
            .is_err());
    }

    #[test]
    fn starts_unbound_with_defaults() {
        let params = ParameterSet::new();
        assert!(params.iter().all(|p| !p.is_bound()));
        assert_eq!(params.value(ParamName::ToneGain), 0.25);
        assert_eq!(params.value(ParamName::ModulatorBDepth), 0.005);
    }

    #[test]
    fn binding_is_independent_of_value() {
        let mut params = ParameterSet::new();
        params.get_mut(ParamName::NoiseGain).store(0.4);
        params.bind_all(|name| ParamBinding {
            node: NodeId::from_raw(7),
            param: name.kind(),
        });
        assert!(params.get(ParamName::NoiseGain).is_bound());

        params.unbind_all();
        assert!(!params.get(ParamName::NoiseGain).is_bound());
        assert_eq!(params.value(ParamName::NoiseGain), 0.4);
    }
}
