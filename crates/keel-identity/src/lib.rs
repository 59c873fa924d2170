//! Project identity: the validated (name, namespace, module) triple and the
//! pure derivations the rewrite engine consumes.
//!
//! Everything here is side-effect free. Validation happens once, at
//! construction; the rest of the workspace only ever sees an already-valid
//! [`ProjectIdentity`].

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    #[error(
        "invalid project name {0:?}: expected letters, digits, '.', '_', '-' or interior spaces, \
         with no leading or trailing '.', '-' or space"
    )]
    InvalidName(String),

    #[error(
        "invalid namespace {0:?}: expected dot-separated segments like \"com.example\", each \
         starting with a letter, with no empty segment and no consecutive '.' or '-'"
    )]
    InvalidNamespace(String),

    #[error(
        "invalid module {0:?}: expected letters and digits separated by single '.' or '-', with \
         no leading or trailing separator"
    )]
    InvalidModule(String),
}

/// The caller-supplied identity of a freshly scaffolded project.
///
/// Only constructible through [`ProjectIdentity::new`], which runs the
/// grammar checks, so holding a value of this type implies the fields are
/// valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIdentity {
    name: String,
    namespace: String,
    module: String,
}

impl ProjectIdentity {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        module: impl Into<String>,
    ) -> Result<Self, IdentityError> {
        let name = name.into();
        let namespace = namespace.into();
        let module = module.into();

        if !is_valid_name(&name) {
            return Err(IdentityError::InvalidName(name));
        }
        if !is_valid_namespace(&namespace) {
            return Err(IdentityError::InvalidNamespace(namespace));
        }
        if !is_valid_module(&module) {
            return Err(IdentityError::InvalidModule(module));
        }

        Ok(Self {
            name,
            namespace,
            module,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    /// Directory segments of the identity's package: namespace segments then
    /// module segments, each with `-` mapped to `_`.
    pub fn package_path(&self) -> Vec<String> {
        derive_package_path(&self.namespace, &self.module)
    }

    /// The dotted package token, i.e. [`Self::package_path`] joined with `.`.
    pub fn package_token(&self) -> String {
        derive_package_token(&self.namespace, &self.module)
    }

    /// Concatenated title-case rendering of the module, e.g. `order-svc` →
    /// `OrderSvc`. The engine appends its entry-point suffix to this.
    pub fn entry_point_name(&self) -> String {
        derive_entry_point_name(&self.module)
    }

    /// Space-joined title-case rendering of the module, e.g. `order-svc` →
    /// `Order Svc`. Used for human-facing configuration fields.
    pub fn display_name(&self) -> String {
        derive_display_name(&self.module)
    }
}

fn name_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Interior spaces are legal ("Order Service"); boundary characters are not.
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z0-9_](?:[A-Za-z0-9._ -]*[A-Za-z0-9_])?$").expect("valid regex")
    })
}

fn namespace_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Segment = letter head, alphanumeric runs separated by single hyphens.
    RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z0-9]*(?:-[A-Za-z0-9]+)*(?:\.[A-Za-z][A-Za-z0-9]*(?:-[A-Za-z0-9]+)*)*$")
            .expect("valid regex")
    })
}

fn module_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9]+(?:[.-][A-Za-z0-9]+)*$").expect("valid regex"))
}

/// Whether `value` is a legal project name. Total: returns `false` rather
/// than failing for any input, including the empty string.
pub fn is_valid_name(value: &str) -> bool {
    name_regex().is_match(value)
}

/// Whether `value` is a legal dot-separated namespace (`com.example`,
/// `a.b-c.d`). Total.
pub fn is_valid_namespace(value: &str) -> bool {
    namespace_regex().is_match(value)
}

/// Whether `value` is a legal module identifier (`order-svc`, `a.b-c`). Total.
pub fn is_valid_module(value: &str) -> bool {
    module_regex().is_match(value)
}

/// Splits `namespace` and `module` on `.` and maps `-` to `_` in every
/// resulting segment, yielding the directory path of the package.
pub fn derive_package_path(namespace: &str, module: &str) -> Vec<String> {
    namespace
        .split('.')
        .chain(module.split('.'))
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.replace('-', "_"))
        .collect()
}

/// The dotted package token: [`derive_package_path`] joined with `.`.
pub fn derive_package_token(namespace: &str, module: &str) -> String {
    derive_package_path(namespace, module).join(".")
}

/// Title-cases each dot/hyphen-separated word of `module` and concatenates:
/// `payment-api` → `PaymentApi`, `a.b-c` → `ABC`. Pure and idempotent for a
/// given module.
pub fn derive_entry_point_name(module: &str) -> String {
    module_words(module).fold(String::new(), |mut out, word| {
        out.push_str(&title_case(word));
        out
    })
}

/// Title-cases each dot/hyphen-separated word of `module` and joins with
/// spaces: `order-svc` → `Order Svc`.
pub fn derive_display_name(module: &str) -> String {
    module_words(module)
        .map(title_case)
        .collect::<Vec<_>>()
        .join(" ")
}

fn module_words(module: &str) -> impl Iterator<Item = &str> {
    module
        .split(['.', '-'])
        .filter(|word| !word.is_empty())
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
