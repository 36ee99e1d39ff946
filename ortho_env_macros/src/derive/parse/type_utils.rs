//! Type introspection helpers.

use syn::visit::{self, Visit};
use syn::{Type, TypeBareFn, TypeTraitObject};

#[derive(Default)]
struct TraitObjectFinder {
    found: bool,
}

impl<'ast> Visit<'ast> for TraitObjectFinder {
    fn visit_type_trait_object(&mut self, _: &'ast TypeTraitObject) {
        self.found = true;
    }

    // Argument and return types of a function pointer do not make the
    // pointer itself abstract.
    fn visit_type_bare_fn(&mut self, _: &'ast TypeBareFn) {}

    fn visit_type(&mut self, ty: &'ast Type) {
        if !self.found {
            visit::visit_type(self, ty);
        }
    }
}

/// Whether `ty` mentions a trait object anywhere outside function pointers.
///
/// `Box<dyn Trait>`, `Arc<dyn Trait + Send>` and `Option<Box<dyn Trait>>`
/// all qualify; `fn(&dyn Trait)` does not.
pub(crate) fn contains_trait_object(ty: &Type) -> bool {
    let mut finder = TraitObjectFinder::default();
    finder.visit_type(ty);
    finder.found
}
