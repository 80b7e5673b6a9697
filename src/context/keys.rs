//! Well-known context keys.

use std::fmt;

/// How the extractor treats a key's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// Non-empty string emitted verbatim.
    Text,
    /// Unsigned integer emitted whenever present, zero included.
    Unsigned,
    /// Start timestamp turned into an elapsed-duration field.
    Start,
    /// `name=value&name=value` string split into independent fields.
    Composite,
    /// Never emitted (credentials).
    Secret,
    /// Read only by the response augmentation branch.
    Transport,
}

macro_rules! context_keys {
    ($($(#[$doc:meta])* $variant:ident => $name:literal, $kind:ident;)+) => {
        /// Fixed vocabulary of context keys.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ContextKey {
            $($(#[$doc])* $variant,)+
        }

        impl ContextKey {
            /// Every key, in extraction order.
            pub const ALL: &'static [ContextKey] = &[$(ContextKey::$variant,)+];

            /// Canonical field name.
            pub const fn name(self) -> &'static str {
                match self {
                    $(ContextKey::$variant => $name,)+
                }
            }

            pub const fn kind(self) -> KeyKind {
                match self {
                    $(ContextKey::$variant => KeyKind::$kind,)+
                }
            }
        }
    };
}

context_keys! {
    AccountEmail => "accountEmail", Text;
    AccountId => "accountId", Text;
    /// Bearer token of the caller.
    AccountJwt => "accountJwt", Secret;
    AccountXsrfState => "accountXsrfState", Secret;
    BlobId => "blobId", Text;
    BlobProviderId => "blobProviderId", Text;
    ClientDate => "clientDate", Text;
    ClientId => "clientId", Text;
    Collection => "collection", Text;
    Database => "database", Text;
    DataProviderId => "dataProviderId", Text;
    Exchange => "exchange", Text;
    File => "file", Text;
    Hostname => "hostname", Text;
    IndexId => "indexId", Text;
    Line => "line", Unsigned;
    NodeId => "nodeId", Text;
    NodeType => "nodeType", Text;
    NodeUri => "nodeUri", Text;
    /// `tenantid=...&workspaceid=...`
    ObjectIds => "objectIds", Composite;
    Referer => "referer", Text;
    RequestStart => "requestStart", Start;
    RequestId => "requestId", Text;
    RequestIp => "requestIp", Text;
    RequestMethod => "requestMethod", Text;
    RequestUrl => "requestUrl", Text;
    ResponseCode => "responseCode", Unsigned;
    ResponseLength => "responseLength", Unsigned;
    SearchEngineId => "searchEngineId", Text;
    SecretProviderId => "secretProviderId", Text;
    WorkerId => "workerId", Text;
    /// Timestamp of the previous log call on the same request.
    SegmentStart => "segmentStart", Transport;
    /// `true` opts a request out of response augmentation.
    Bulk => "bulk", Transport;
}

impl ContextKey {
    /// Look a key up by its canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|key| key.name() == name)
    }

    /// Name of the field derived from a `Start` key.
    pub(crate) const fn derived_name(self) -> &'static str {
        match self {
            ContextKey::RequestStart => "requestDuration",
            _ => self.name(),
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
