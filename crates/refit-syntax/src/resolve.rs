//! Call-target resolution against a declarative signature table.
//!
//! Real type resolution is an external collaborator's job; the engine only
//! needs the *outcome*: a fully qualified [`MethodSig`] on each call it may
//! rewrite, or `None`. The [`Resolver`] trait is the seam, and
//! [`SignatureTable`] is the shipped implementation — a registry of known
//! method declarations resolved through the unit's import list.
//!
//! Anything not declared in the table resolves to `None`, and an unresolved
//! call is never matched. That conservatism is deliberate: a call site whose
//! target is unknown must never be rewritten speculatively.

use crate::tree::{ImportDecl, MethodSig};

/// Context describing one call site awaiting resolution.
#[derive(Debug, Clone, Copy)]
pub struct CallSite<'a> {
    /// The translation unit's import declarations.
    pub imports: &'a [ImportDecl],
    /// The receiver's simple name, when the receiver is a bare identifier.
    pub receiver: Option<&'a str>,
    /// The invoked member name.
    pub name: &'a str,
    /// The number of arguments at the call site.
    pub arg_count: usize,
}

/// Resolves call sites to method signatures.
pub trait Resolver {
    /// Resolves a call site, returning `None` when the target is unknown.
    fn resolve_call(&self, site: &CallSite<'_>) -> Option<MethodSig>;
}

/// A declarative registry of known method signatures.
///
/// Stands in for the external type-resolution collaborator: callers declare
/// the methods their rules understand, and resolution combines those
/// declarations with the unit's imports.
#[derive(Debug, Clone, Default)]
pub struct SignatureTable {
    sigs: Vec<MethodSig>,
}

impl SignatureTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { sigs: Vec::new() }
    }

    /// Declares a known method, chaining-style.
    #[must_use]
    pub fn method(mut self, owner: &str, name: &str, params: &[&str], returns: Option<&str>) -> Self {
        self.sigs.push(MethodSig::new(owner, name, params, returns));
        self
    }

    /// Declares a known method in place.
    pub fn declare(&mut self, sig: MethodSig) {
        self.sigs.push(sig);
    }

    /// Returns the declared signatures.
    #[must_use]
    pub fn signatures(&self) -> &[MethodSig] {
        &self.sigs
    }

    /// Returns whether the owner type is visible under the unit's imports
    /// for a receiver written as `simple`.
    fn owner_visible(imports: &[ImportDecl], owner: &str, simple: &str) -> bool {
        let expected_simple = owner.rsplit('.').next().unwrap_or(owner);
        if expected_simple != simple {
            return false;
        }

        imports.iter().any(|import| {
            if import.is_static {
                return false;
            }
            if import.is_wildcard() {
                let package = import.base_name();
                owner
                    .strip_prefix(package)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .is_some_and(|rest| rest == simple)
            } else {
                import.name == owner
            }
        })
    }

    /// Returns whether the member is reachable unqualified via a static
    /// import of `owner.name` or `owner.*`.
    fn static_member_visible(imports: &[ImportDecl], owner: &str, name: &str) -> bool {
        imports.iter().any(|import| {
            import.is_static
                && (import.name == format!("{owner}.{name}")
                    || import.name == format!("{owner}.*"))
        })
    }
}

impl Resolver for SignatureTable {
    fn resolve_call(&self, site: &CallSite<'_>) -> Option<MethodSig> {
        self.sigs
            .iter()
            .find(|sig| {
                if sig.name != site.name || sig.params.len() != site.arg_count {
                    return false;
                }

                match site.receiver {
                    Some(simple) => Self::owner_visible(site.imports, &sig.owner, simple),
                    None => Self::static_member_visible(site.imports, &sig.owner, &sig.name),
                }
            })
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports() -> Vec<ImportDecl> {
        vec![
            ImportDecl {
                prefix: String::new(),
                is_static: true,
                name: "org.hamcrest.MatcherAssert.assertThat".to_owned(),
            },
            ImportDecl {
                prefix: String::new(),
                is_static: false,
                name: "com.google.common.collect.*".to_owned(),
            },
        ]
    }

    fn table() -> SignatureTable {
        SignatureTable::new()
            .method(
                "org.hamcrest.MatcherAssert",
                "assertThat",
                &["java.lang.Object", "org.hamcrest.Matcher"],
                None,
            )
            .method(
                "com.google.common.collect.Lists",
                "newArrayList",
                &["java.lang.Iterable"],
                Some("java.util.ArrayList"),
            )
    }

    #[test]
    fn resolves_via_static_import() {
        let imports = imports();
        let sig = table().resolve_call(&CallSite {
            imports: &imports,
            receiver: None,
            name: "assertThat",
            arg_count: 2,
        });

        assert_eq!(
            sig.map(|s| s.owner),
            Some("org.hamcrest.MatcherAssert".to_owned())
        );
    }

    #[test]
    fn resolves_receiver_via_wildcard_import() {
        let imports = imports();
        let sig = table().resolve_call(&CallSite {
            imports: &imports,
            receiver: Some("Lists"),
            name: "newArrayList",
            arg_count: 1,
        });

        assert_eq!(
            sig.map(|s| s.owner),
            Some("com.google.common.collect.Lists".to_owned())
        );
    }

    #[test]
    fn unknown_method_is_unresolved() {
        let imports = imports();
        let sig = table().resolve_call(&CallSite {
            imports: &imports,
            receiver: None,
            name: "sameBeanAs",
            arg_count: 1,
        });

        assert_eq!(sig, None);
    }

    #[test]
    fn arity_mismatch_is_unresolved() {
        let imports = imports();
        let sig = table().resolve_call(&CallSite {
            imports: &imports,
            receiver: Some("Lists"),
            name: "newArrayList",
            arg_count: 2,
        });

        assert_eq!(sig, None);
    }

    #[test]
    fn missing_import_is_unresolved() {
        let sig = table().resolve_call(&CallSite {
            imports: &[],
            receiver: Some("Lists"),
            name: "newArrayList",
            arg_count: 1,
        });

        assert_eq!(sig, None);
    }
}
