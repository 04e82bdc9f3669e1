//! Operation types exchanged between server and client.
//!
//! Each protocol action has its own record type carrying only the fields
//! meaningful to it. [`Operation`] wraps them into a closed sum type whose
//! wire form is tagged by the `action` field. Decoding reads that
//! discriminator first and then decodes the matching record, so an unknown
//! action is distinguishable from a known action with a malformed body.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;
use crate::property::{PropertyMap, PropertyValue};

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Discriminator naming the kind of an operation.
///
/// # Example
///
/// ```
/// use widgetwire_protocol::Action;
///
/// assert_eq!(Action::ExecuteScript.as_str(), "executeScript");
/// assert_eq!(Action::from_wire("listen"), Some(Action::Listen));
/// assert_eq!(Action::from_wire("foo"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Instantiate a remote object.
    Create,
    /// Dispose of a remote object.
    Destroy,
    /// Assign properties.
    Set,
    /// Subscribe to or unsubscribe from events.
    Listen,
    /// Invoke a remote method.
    Call,
    /// Evaluate a script.
    ExecuteScript,
}

impl Action {
    /// Returns the wire discriminator for this action.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Destroy => "destroy",
            Self::Set => "set",
            Self::Listen => "listen",
            Self::Call => "call",
            Self::ExecuteScript => "executeScript",
        }
    }

    /// Resolves a wire discriminator to an action.
    #[must_use]
    pub fn from_wire(action: &str) -> Option<Self> {
        match action {
            "create" => Some(Self::Create),
            "destroy" => Some(Self::Destroy),
            "set" => Some(Self::Set),
            "listen" => Some(Self::Listen),
            "call" => Some(Self::Call),
            "executeScript" => Some(Self::ExecuteScript),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// PropertyOperation trait
// ---------------------------------------------------------------------------

/// Accessors shared by operation kinds that carry a property map.
///
/// Reading a property that is not present is an error rather than a
/// default: callers that expect absence should check
/// [`has_property`](Self::has_property) first.
pub trait PropertyOperation {
    /// Returns the operation target.
    fn target(&self) -> &str;

    /// Returns the full property map.
    fn properties(&self) -> &PropertyMap;

    /// Returns the named property.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PropertyNotFound`] when the operation does
    /// not carry the property.
    fn property(&self, name: &str) -> Result<&PropertyValue, ProtocolError> {
        self.properties()
            .get(name)
            .ok_or_else(|| ProtocolError::property_not_found(self.target(), name))
    }

    /// Returns the property names in wire order.
    fn property_names(&self) -> Vec<&str> {
        self.properties().names().collect()
    }

    /// Returns `true` when the operation carries the property.
    fn has_property(&self, name: &str) -> bool {
        self.properties().contains(name)
    }
}

// ---------------------------------------------------------------------------
// Operation records
// ---------------------------------------------------------------------------

/// Instantiates a remote object of the given type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOperation {
    target: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    properties: PropertyMap,
}

impl CreateOperation {
    /// Creates a create operation with no initial properties.
    #[must_use]
    pub fn new(target: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            type_name: type_name.into(),
            properties: PropertyMap::new(),
        }
    }

    /// Returns the remote type to instantiate.
    #[must_use]
    pub const fn type_name(&self) -> &str {
        self.type_name.as_str()
    }

    pub(crate) const fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

impl PropertyOperation for CreateOperation {
    fn target(&self) -> &str {
        &self.target
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// Disposes of a remote object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyOperation {
    target: String,
}

impl DestroyOperation {
    /// Creates a destroy operation.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// Returns the operation target.
    #[must_use]
    pub const fn target(&self) -> &str {
        self.target.as_str()
    }
}

/// Assigns properties on a remote object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOperation {
    target: String,
    #[serde(default)]
    properties: PropertyMap,
}

impl SetOperation {
    /// Creates a set operation with the given properties.
    #[must_use]
    pub fn new(target: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            target: target.into(),
            properties,
        }
    }

    pub(crate) const fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }
}

impl PropertyOperation for SetOperation {
    fn target(&self) -> &str {
        &self.target
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// Subscribes to or unsubscribes from events on a remote object.
///
/// Each property name is an event name; its boolean value states whether the
/// client should report that event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListenOperation {
    target: String,
    #[serde(default)]
    properties: PropertyMap,
}

impl ListenOperation {
    /// Creates a listen operation with the given event flags.
    #[must_use]
    pub fn new(target: impl Into<String>, properties: PropertyMap) -> Self {
        Self {
            target: target.into(),
            properties,
        }
    }

    /// Returns whether the operation enables the named event.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::PropertyNotFound`] when the event is not
    /// mentioned by this operation.
    pub fn listens_to(&self, event: &str) -> Result<bool, ProtocolError> {
        let value = self.property(event)?;
        Ok(value.as_bool().unwrap_or(false))
    }

    pub(crate) const fn properties_mut(&mut self) -> &mut PropertyMap {
        &mut self.properties
    }

    fn validate(&self, index: usize) -> Result<(), ProtocolError> {
        match self.properties.iter().find(|(_, value)| value.as_bool().is_none()) {
            Some((event, value)) => Err(ProtocolError::malformed_operation(
                index,
                format!("listen flag '{event}' must be a boolean, got {value}"),
            )),
            None => Ok(()),
        }
    }
}

impl PropertyOperation for ListenOperation {
    fn target(&self) -> &str {
        &self.target
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// Invokes a named method on a remote object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallOperation {
    target: String,
    #[serde(rename = "method")]
    method_name: String,
    #[serde(default)]
    properties: PropertyMap,
}

impl CallOperation {
    /// Creates a call operation; arguments are passed as properties.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        method_name: impl Into<String>,
        properties: PropertyMap,
    ) -> Self {
        Self {
            target: target.into(),
            method_name: method_name.into(),
            properties,
        }
    }

    /// Returns the method to invoke.
    #[must_use]
    pub const fn method_name(&self) -> &str {
        self.method_name.as_str()
    }
}

impl PropertyOperation for CallOperation {
    fn target(&self) -> &str {
        &self.target
    }

    fn properties(&self) -> &PropertyMap {
        &self.properties
    }
}

/// Evaluates a script on the client.
///
/// Carries no property map; the target is written for symmetry but ignored
/// by readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecuteScriptOperation {
    #[serde(default)]
    target: String,
    #[serde(rename = "type")]
    script_type: String,
    #[serde(rename = "content")]
    script: String,
}

impl ExecuteScriptOperation {
    /// Creates an execute-script operation.
    #[must_use]
    pub fn new(
        target: impl Into<String>,
        script_type: impl Into<String>,
        script: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            script_type: script_type.into(),
            script: script.into(),
        }
    }

    /// Returns the operation target.
    #[must_use]
    pub const fn target(&self) -> &str {
        self.target.as_str()
    }

    /// Returns the script language, usually a MIME type.
    #[must_use]
    pub const fn script_type(&self) -> &str {
        self.script_type.as_str()
    }

    /// Returns the script body.
    #[must_use]
    pub const fn script(&self) -> &str {
        self.script.as_str()
    }
}

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// One protocol action targeting a single remote object.
///
/// Serialised with an `action` discriminator alongside the record fields.
///
/// # Example
///
/// ```
/// use widgetwire_protocol::{Action, Operation, DestroyOperation};
///
/// let operation = Operation::Destroy(DestroyOperation::new("w3"));
/// assert_eq!(operation.action(), Action::Destroy);
/// assert_eq!(operation.target(), "w3");
/// assert!(operation.property_names().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Operation {
    /// See [`CreateOperation`].
    Create(CreateOperation),
    /// See [`DestroyOperation`].
    Destroy(DestroyOperation),
    /// See [`SetOperation`].
    Set(SetOperation),
    /// See [`ListenOperation`].
    Listen(ListenOperation),
    /// See [`CallOperation`].
    Call(CallOperation),
    /// See [`ExecuteScriptOperation`].
    ExecuteScript(ExecuteScriptOperation),
}

impl Operation {
    /// Decodes the operation at `index` from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnknownAction`] when the `action` field names
    /// no known operation kind, and [`ProtocolError::MalformedOperation`]
    /// when the entry is not an object, lacks a string `action`, or does not
    /// match the shape its action requires.
    pub fn decode(index: usize, raw: &Value) -> Result<Self, ProtocolError> {
        let discriminator = raw
            .get("action")
            .ok_or_else(|| ProtocolError::malformed_operation(index, "missing action"))?
            .as_str()
            .ok_or_else(|| ProtocolError::malformed_operation(index, "action must be a string"))?;
        let action = Action::from_wire(discriminator)
            .ok_or_else(|| ProtocolError::unknown_action(index, discriminator))?;

        let shape_error =
            |error: serde_json::Error| ProtocolError::malformed_operation(index, error.to_string());
        let operation = match action {
            Action::Create => Self::Create(CreateOperation::deserialize(raw).map_err(shape_error)?),
            Action::Destroy => {
                Self::Destroy(DestroyOperation::deserialize(raw).map_err(shape_error)?)
            }
            Action::Set => Self::Set(SetOperation::deserialize(raw).map_err(shape_error)?),
            Action::Listen => {
                let listen = ListenOperation::deserialize(raw).map_err(shape_error)?;
                listen.validate(index)?;
                Self::Listen(listen)
            }
            Action::Call => Self::Call(CallOperation::deserialize(raw).map_err(shape_error)?),
            Action::ExecuteScript => {
                Self::ExecuteScript(ExecuteScriptOperation::deserialize(raw).map_err(shape_error)?)
            }
        };
        Ok(operation)
    }

    /// Returns the operation kind.
    #[must_use]
    pub const fn action(&self) -> Action {
        match self {
            Self::Create(_) => Action::Create,
            Self::Destroy(_) => Action::Destroy,
            Self::Set(_) => Action::Set,
            Self::Listen(_) => Action::Listen,
            Self::Call(_) => Action::Call,
            Self::ExecuteScript(_) => Action::ExecuteScript,
        }
    }

    /// Returns the identifier of the object the operation applies to.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            Self::Create(operation) => operation.target(),
            Self::Destroy(operation) => operation.target(),
            Self::Set(operation) => operation.target(),
            Self::Listen(operation) => operation.target(),
            Self::Call(operation) => operation.target(),
            Self::ExecuteScript(operation) => operation.target(),
        }
    }

    /// Returns the property map for kinds that carry one.
    #[must_use]
    pub fn properties(&self) -> Option<&PropertyMap> {
        match self {
            Self::Create(operation) => Some(operation.properties()),
            Self::Set(operation) => Some(operation.properties()),
            Self::Listen(operation) => Some(operation.properties()),
            Self::Call(operation) => Some(operation.properties()),
            Self::Destroy(_) | Self::ExecuteScript(_) => None,
        }
    }

    /// Returns the property names in wire order.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnsupportedOperation`] for destroy and
    /// execute-script operations, which carry no property map.
    pub fn property_names(&self) -> Result<Vec<&str>, ProtocolError> {
        self.require_properties("property_names")
            .map(|properties| properties.names().collect())
    }

    /// Returns the named property.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::UnsupportedOperation`] for kinds without a
    /// property map and [`ProtocolError::PropertyNotFound`] when the property
    /// is absent.
    pub fn property(&self, name: &str) -> Result<&PropertyValue, ProtocolError> {
        self.require_properties("property")?
            .get(name)
            .ok_or_else(|| ProtocolError::property_not_found(self.target(), name))
    }

    /// Returns the create record, if this is a create operation.
    #[must_use]
    pub const fn as_create(&self) -> Option<&CreateOperation> {
        match self {
            Self::Create(operation) => Some(operation),
            _ => None,
        }
    }

    /// Returns the destroy record, if this is a destroy operation.
    #[must_use]
    pub const fn as_destroy(&self) -> Option<&DestroyOperation> {
        match self {
            Self::Destroy(operation) => Some(operation),
            _ => None,
        }
    }

    /// Returns the set record, if this is a set operation.
    #[must_use]
    pub const fn as_set(&self) -> Option<&SetOperation> {
        match self {
            Self::Set(operation) => Some(operation),
            _ => None,
        }
    }

    /// Returns the listen record, if this is a listen operation.
    #[must_use]
    pub const fn as_listen(&self) -> Option<&ListenOperation> {
        match self {
            Self::Listen(operation) => Some(operation),
            _ => None,
        }
    }

    /// Returns the call record, if this is a call operation.
    #[must_use]
    pub const fn as_call(&self) -> Option<&CallOperation> {
        match self {
            Self::Call(operation) => Some(operation),
            _ => None,
        }
    }

    /// Returns the execute-script record, if this is one.
    #[must_use]
    pub const fn as_execute_script(&self) -> Option<&ExecuteScriptOperation> {
        match self {
            Self::ExecuteScript(operation) => Some(operation),
            _ => None,
        }
    }

    fn require_properties(&self, operation: &'static str) -> Result<&PropertyMap, ProtocolError> {
        self.properties()
            .ok_or_else(|| ProtocolError::UnsupportedOperation {
                action: self.action(),
                operation,
            })
    }
}
