//! Diagnostic message table for the resolution pass.

use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const UNABLE_TO_RESOLVE_TYPE: u32 = 9001;
    pub const AMBIGUOUS_REFERENCE: u32 = 9002;
    pub const CYCLIC_INHERITANCE_IN_CLASS: u32 = 9003;
    pub const CYCLIC_INHERITANCE_IN_INTERFACE: u32 = 9004;
    pub const TYPE_CANNOT_IMPLEMENT_ITSELF: u32 = 9005;
    pub const RESOLUTION_TOO_DEEP: u32 = 9006;
    pub const UNABLE_TO_RESOLVE_IMPORT: u32 = 9007;
}

pub mod diagnostic_messages {
    use super::{DiagnosticCategory, DiagnosticMessage, diagnostic_codes};

    pub const UNABLE_TO_RESOLVE_TYPE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNABLE_TO_RESOLVE_TYPE,
        category: DiagnosticCategory::Error,
        message: "unable to resolve type {0}",
    };
    pub const AMBIGUOUS_REFERENCE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::AMBIGUOUS_REFERENCE,
        category: DiagnosticCategory::Error,
        message: "reference to {0} is ambiguous, both {1} and {2} match",
    };
    pub const CYCLIC_INHERITANCE_IN_CLASS: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CYCLIC_INHERITANCE_IN_CLASS,
        category: DiagnosticCategory::Error,
        message: "cyclic inheritance involving {0} in class {1}",
    };
    pub const CYCLIC_INHERITANCE_IN_INTERFACE: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::CYCLIC_INHERITANCE_IN_INTERFACE,
        category: DiagnosticCategory::Error,
        message: "cyclic inheritance involving {0} in interface {1}",
    };
    pub const TYPE_CANNOT_IMPLEMENT_ITSELF: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::TYPE_CANNOT_IMPLEMENT_ITSELF,
        category: DiagnosticCategory::Error,
        message: "the type {0} cannot implement itself",
    };
    pub const RESOLUTION_TOO_DEEP: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::RESOLUTION_TOO_DEEP,
        category: DiagnosticCategory::Error,
        message: "type resolution of {0} exceeded the maximum nesting depth",
    };
    pub const UNABLE_TO_RESOLVE_IMPORT: DiagnosticMessage = DiagnosticMessage {
        code: diagnostic_codes::UNABLE_TO_RESOLVE_IMPORT,
        category: DiagnosticCategory::Error,
        message: "unable to resolve import {0}",
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = &[
    diagnostic_messages::UNABLE_TO_RESOLVE_TYPE,
    diagnostic_messages::AMBIGUOUS_REFERENCE,
    diagnostic_messages::CYCLIC_INHERITANCE_IN_CLASS,
    diagnostic_messages::CYCLIC_INHERITANCE_IN_INTERFACE,
    diagnostic_messages::TYPE_CANNOT_IMPLEMENT_ITSELF,
    diagnostic_messages::RESOLUTION_TOO_DEEP,
    diagnostic_messages::UNABLE_TO_RESOLVE_IMPORT,
];
