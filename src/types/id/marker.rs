use crate::internal::Sealed;

macro_rules! markers {
    { $( $(#[$meta:meta])* $ident:ident, )* } => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $ident;
        impl Sealed for $ident {}
        impl Marker for $ident {}
    )*};
}

markers! {
    /// Marker for ids that are not tied to any table.
    AnyMarker,
    /// Marker for artwork posts.
    PostMarker,
    /// Marker for notification rows.
    NotificationMarker,
}

/// This trait represents a marker restricting all objects to
/// from using it as a generic in [`Id`](super::Id) object.
pub trait Marker: Sealed {
    /// Human readable name used for [`Debug`] output.
    fn name() -> &'static str {
        let type_name = std::any::type_name::<Self>();
        type_name.rsplit("::").next().unwrap_or(type_name)
    }
}
