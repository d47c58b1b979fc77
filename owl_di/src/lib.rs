extern crate self as owl_di;

pub use owl_di_derive::Build;
pub use typemap::TypeMap;

mod macros;
mod typemap;

/// A container that services are built from.
///
/// Every type built through a provider is cached, so repeated calls to
/// [`Provide::provide`] hand out clones of the same instance.
pub trait Provider: Sized {
    fn cache(&mut self) -> &mut TypeMap;
}

#[diagnostic::on_unimplemented(
    message = "The type `{Self}` cannot be built using the provider `{P}`",
    note = "Add `{Self}` to the provider `{P}` or implement `Build` for `{Self}` and make sure \
            all dependencies are satisfied"
)]
pub trait Build<P: Provider>: Clone + 'static {
    fn build(provider: &mut P) -> Self;
}

pub trait Provide: Provider {
    fn provide<T: Build<Self>>(&mut self) -> T {
        T::build(self)
    }
}

impl<P: Provider> Provide for P {}
