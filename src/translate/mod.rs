//! Structural translation between independently defined schema types
//!
//! A [`Translator`] converts a value of one schema version into the matching
//! value of another. For every (source, destination) type pair it either
//! applies a registered override or falls back to the pair's
//! [`TranslateFrom`] implementation, which copies same-named fields and
//! recurses into them through the same translator.
//!
//! Overrides receive only the source value, never the translator that holds
//! them. An override that needs to translate a subtree of its own source type
//! must build a fresh `Translator`; re-entering the outer one would apply the
//! override to its own input forever.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

/// Structural conversion from a source schema type.
///
/// Implementations should translate every nested field through `tr` so that
/// overrides registered for nested types are honoured. Record types use
/// [`structural_translation!`](crate::structural_translation).
pub trait TranslateFrom<S>: Sized {
    fn translate_from(src: S, tr: &Translator) -> Self;
}

type Rule<S, D> = Box<dyn Fn(S) -> D + Send + Sync>;

/// A single-use set of override rules driving one translation run
#[derive(Default)]
pub struct Translator {
    rules: HashMap<(TypeId, TypeId), Box<dyn Any + Send + Sync>>,
}

impl Translator {
    /// A translator with no overrides: pure structural copy
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` as the replacement for structural translation of
    /// `S` into `D`. A later registration for the same pair replaces the
    /// earlier one.
    pub fn add_custom_translator<S, D, F>(&mut self, rule: F)
    where
        S: 'static,
        D: 'static,
        F: Fn(S) -> D + Send + Sync + 'static,
    {
        let rule: Rule<S, D> = Box::new(rule);
        self.rules
            .insert((TypeId::of::<S>(), TypeId::of::<D>()), Box::new(rule));
    }

    /// Translate `src`, preferring a registered override for `(S, D)`
    pub fn translate<S, D>(&self, src: S) -> D
    where
        S: 'static,
        D: TranslateFrom<S> + 'static,
    {
        match self.rule::<S, D>() {
            Some(rule) => {
                tracing::trace!(
                    from = std::any::type_name::<S>(),
                    to = std::any::type_name::<D>(),
                    "applying custom translator"
                );
                rule(src)
            }
            None => D::translate_from(src, self),
        }
    }

    /// Translate `src` into an existing destination slot
    pub fn translate_into<S, D>(&self, src: S, dst: &mut D)
    where
        S: 'static,
        D: TranslateFrom<S> + 'static,
    {
        *dst = self.translate(src);
    }

    pub fn has_custom_translator<S: 'static, D: 'static>(&self) -> bool {
        self.rule::<S, D>().is_some()
    }

    fn rule<S: 'static, D: 'static>(&self) -> Option<&Rule<S, D>> {
        self.rules
            .get(&(TypeId::of::<S>(), TypeId::of::<D>()))
            .and_then(|rule| rule.downcast_ref::<Rule<S, D>>())
    }
}

impl std::fmt::Debug for Translator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Translator")
            .field("rules", &self.rules.len())
            .finish()
    }
}

macro_rules! identity_translation {
    ($($t:ty),* $(,)?) => {
        $(
            impl TranslateFrom<$t> for $t {
                fn translate_from(src: $t, _tr: &Translator) -> Self {
                    src
                }
            }
        )*
    };
}

identity_translation!(String, bool, char, i8, i16, i32, i64, u8, u16, u32, u64, usize, f32, f64);

impl<S: 'static, D: TranslateFrom<S> + 'static> TranslateFrom<Vec<S>> for Vec<D> {
    fn translate_from(src: Vec<S>, tr: &Translator) -> Self {
        src.into_iter().map(|item| tr.translate(item)).collect()
    }
}

impl<S: 'static, D: TranslateFrom<S> + 'static> TranslateFrom<Option<S>> for Option<D> {
    fn translate_from(src: Option<S>, tr: &Translator) -> Self {
        src.map(|value| tr.translate(value))
    }
}

impl<S: 'static, D: TranslateFrom<S> + 'static> TranslateFrom<Box<S>> for Box<D> {
    fn translate_from(src: Box<S>, tr: &Translator) -> Self {
        Box::new(tr.translate(*src))
    }
}

impl<K, S, D> TranslateFrom<BTreeMap<K, S>> for BTreeMap<K, D>
where
    K: Ord + 'static,
    S: 'static,
    D: TranslateFrom<S> + 'static,
{
    fn translate_from(src: BTreeMap<K, S>, tr: &Translator) -> Self {
        src.into_iter()
            .map(|(key, value)| (key, tr.translate(value)))
            .collect()
    }
}

/// Implement [`TranslateFrom`] for a record type by copying the listed fields.
///
/// List the fields the source and destination share. Each is translated
/// through the active translator; destination-only fields take their
/// `Default` value.
///
/// ```ignore
/// structural_translation!(old::Unit => new::Unit { name, enabled, dropins });
/// ```
#[macro_export]
macro_rules! structural_translation {
    ($src:ty => $dst:ty { $($field:ident),* $(,)? }) => {
        impl $crate::translate::TranslateFrom<$src> for $dst {
            #[allow(clippy::needless_update, unused_variables)]
            fn translate_from(src: $src, tr: &$crate::translate::Translator) -> Self {
                Self {
                    $($field: tr.translate(src.$field),)*
                    ..::std::default::Default::default()
                }
            }
        }
    };
}
