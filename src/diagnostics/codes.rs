// src/diagnostics/codes.rs

use crate::diagnostics::DiagnosticLevel;

/// Represents a specific error code with its associated information.
/// This struct serves as the single source of truth for all diagnostics.
#[derive(Debug, Clone)]
pub struct ErrorCode {
    pub code: &'static str,
    pub level: DiagnosticLevel,
    pub message: &'static str,
    pub explanation: &'static str,
}

/*
E00xx: 词法分析 (Lexical Analysis) 错误。

E01xx: 语法分析 (Parsing / Syntax) 错误。

E02xx: 作用域与符号解析 (Scope & Symbol Resolution) 错误。

W02xx: 注解相关的警告。
*/
// --- E00xx: Lexical Analysis Errors ---

pub const E0000_UNRECOGNIZED_CHAR: ErrorCode = ErrorCode {
    code: "E0000",
    level: DiagnosticLevel::Error,
    message: "Unrecognized character",
    explanation: "The lexer encountered a character that is not part of the supported C-family subset. \
                  This can happen due to typos, preprocessor directives or unsupported operators.",
};

// --- E01xx: Syntax Analysis (Parsing) Errors ---

pub const E0100_SYNTAX_ERROR: ErrorCode = ErrorCode {
    code: "E0100",
    level: DiagnosticLevel::Error,
    message: "Syntax error",
    explanation: "The arrangement of tokens does not match any declaration or statement form of the supported subset. \
                  Check for missing semicolons, mismatched braces or unsupported constructs.",
};

// --- E02xx: Scope & Symbol Resolution Errors ---

pub const E0200_DUPLICATE_DECLARATION: ErrorCode = ErrorCode {
    code: "E0200",
    level: DiagnosticLevel::Error,
    message: "Duplicate declaration",
    explanation: "Two declarations of the same name and kind live in the same scope and they are not a \
                  forward-declaration/definition pair. The scope graph of this translation unit cannot be trusted, \
                  so resolution stops here.",
};

pub const E0201_NOT_FOUND: ErrorCode = ErrorCode {
    code: "E0201",
    level: DiagnosticLevel::Error,
    message: "Name not found",
    explanation: "A referenced name could not be found in the active scope or any enclosing scope, up to the global scope.",
};

pub const E0202_UNBOUND_ANNOTATION: ErrorCode = ErrorCode {
    code: "E0202",
    level: DiagnosticLevel::Error,
    message: "Annotation is not attached to any declaration",
    explanation: "An annotation comment names an identifier that the following declaration neither declares nor reads, \
                  or no declaration follows it before its scope closes.",
};

pub const E0203_DETACHED_SCOPE: ErrorCode = ErrorCode {
    code: "E0203",
    level: DiagnosticLevel::Error,
    message: "Detached scope",
    explanation: "A scope chain does not reach the global scope. This indicates a bug in whatever built the scope graph.",
};

pub const E0204_FRAME_MISMATCH: ErrorCode = ErrorCode {
    code: "E0204",
    level: DiagnosticLevel::Error,
    message: "Frame assertion does not hold",
    explanation: "A `frame(name) = (classification, entity)` annotation disagrees with the frame computed for `name`.",
};

// --- W02xx: Annotation Warnings ---

pub const W0200_MALFORMED_ANNOTATION: ErrorCode = ErrorCode {
    code: "W0200",
    level: DiagnosticLevel::Warning,
    message: "Malformed frame annotation",
    explanation: "The comment looks like a frame assertion but does not follow \
                  `/// frame(<name>) = (<global|local|member|template-param|namespace>, <entity|_>)`. It is ignored.",
};
