//! Statically shaped constructor arguments.
//!
//! The dynamic API takes [`Args`] and only discovers a wrong argument shape
//! at construction time. The wrappers here attach the argument shape to the
//! class handle, so that a composite's constructor takes a tuple with one
//! element per component and the compiler checks it:
//!
//! ```ignore
//! let point: TypedClass<(f64, f64)> = TypedClass::new(point_class);
//! let label: TypedClass<(&str,)> = TypedClass::new(label_class);
//! let labelled = typed::mix((point, label))?;
//! let value = labelled.construct(((1.0, 2.0), ("origin",)))?;
//! ```

use crate::class::{Args, ClassRef};
use crate::composer::{ComposeOptions, Composer};
use crate::error::RuntimeResult;
use crate::value::Value;
use smallvec::{SmallVec, smallvec};
use std::marker::PhantomData;

/// Conversion of a Rust tuple into positional constructor arguments.
pub trait IntoArgs {
    fn into_args(self) -> Args;
}

impl IntoArgs for Args {
    fn into_args(self) -> Args {
        self
    }
}

impl IntoArgs for Vec<Value> {
    fn into_args(self) -> Args {
        Args::Positional(self)
    }
}

macro_rules! impl_into_args {
    ($($T:ident $v:ident),*) => {
        impl<$($T: Into<Value>),*> IntoArgs for ($($T,)*) {
            fn into_args(self) -> Args {
                let ($($v,)*) = self;
                Args::Positional(vec![$($v.into()),*])
            }
        }
    };
}

impl_into_args!();
impl_into_args!(A a);
impl_into_args!(A a, B b);
impl_into_args!(A a, B b, C c);
impl_into_args!(A a, B b, C c, D d);
impl_into_args!(A a, B b, C c, D d, E e);
impl_into_args!(A a, B b, C c, D d, E e, F f);

/// A class usable as a composite component, with its argument shape.
pub trait Component {
    type Args;

    fn class(&self) -> &ClassRef;

    fn lower(args: Self::Args) -> Args;
}

/// A class whose constructor takes `A`.
pub struct TypedClass<A> {
    class: ClassRef,
    _args: PhantomData<fn(A)>,
}

impl<A: IntoArgs> TypedClass<A> {
    pub fn new(class: ClassRef) -> Self {
        Self {
            class,
            _args: PhantomData,
        }
    }

    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn construct(&self, args: A) -> RuntimeResult<Value> {
        self.class.construct(args.into_args())
    }
}

impl<A> Clone for TypedClass<A> {
    fn clone(&self) -> Self {
        Self {
            class: self.class.clone(),
            _args: PhantomData,
        }
    }
}

impl<A: IntoArgs> Component for TypedClass<A> {
    type Args = A;

    fn class(&self) -> &ClassRef {
        &self.class
    }

    fn lower(args: A) -> Args {
        args.into_args()
    }
}

/// A tuple of components, primary first.
pub trait ComponentList {
    /// One argument value per component.
    type Args;

    fn primary(&self) -> &ClassRef;

    fn auxiliaries(&self) -> SmallVec<[ClassRef; 4]>;

    fn lower(args: Self::Args) -> Args;
}

macro_rules! impl_component_list {
    ($P:ident $p:ident $(, $C:ident $c:ident)*) => {
        impl<$P: Component $(, $C: Component)*> ComponentList for ($P, $($C,)*) {
            type Args = ($P::Args, $($C::Args,)*);

            fn primary(&self) -> &ClassRef {
                self.0.class()
            }

            fn auxiliaries(&self) -> SmallVec<[ClassRef; 4]> {
                let (_, $($c,)*) = self;
                smallvec![$($c.class().clone()),*]
            }

            fn lower(args: Self::Args) -> Args {
                let ($p, $($c,)*) = args;
                Args::PerComponent(vec![$P::lower($p) $(, $C::lower($c))*])
            }
        }
    };
}

impl_component_list!(P p);
impl_component_list!(P p, A1 a1);
impl_component_list!(P p, A1 a1, A2 a2);
impl_component_list!(P p, A1 a1, A2 a2, A3 a3);
impl_component_list!(P p, A1 a1, A2 a2, A3 a3, A4 a4);
impl_component_list!(P p, A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);

/// A composite class whose constructor takes `L::Args`.
pub struct TypedComposite<L> {
    class: ClassRef,
    _components: PhantomData<fn() -> L>,
}

impl<L: ComponentList> TypedComposite<L> {
    pub fn class(&self) -> &ClassRef {
        &self.class
    }

    pub fn construct(&self, args: L::Args) -> RuntimeResult<Value> {
        self.class.construct(L::lower(args))
    }
}

impl<L> Clone for TypedComposite<L> {
    fn clone(&self) -> Self {
        Self {
            class: self.class.clone(),
            _components: PhantomData,
        }
    }
}

/// A typed composite nests as a component of a further composite.
impl<L: ComponentList> Component for TypedComposite<L> {
    type Args = L::Args;

    fn class(&self) -> &ClassRef {
        &self.class
    }

    fn lower(args: L::Args) -> Args {
        L::lower(args)
    }
}

pub fn mix<L: ComponentList>(components: L) -> RuntimeResult<TypedComposite<L>> {
    mix_with(components, ComposeOptions::default())
}

pub fn mix_with<L: ComponentList>(
    components: L,
    options: ComposeOptions,
) -> RuntimeResult<TypedComposite<L>> {
    let class = Composer::new(components.primary())
        .with_all(&components.auxiliaries())
        .options(options)
        .build()?;
    Ok(TypedComposite {
        class,
        _components: PhantomData,
    })
}

#[cfg(test)]
#[path = "tests/typed_tests.rs"]
mod tests;
