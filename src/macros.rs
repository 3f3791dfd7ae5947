/// Generates accessor functions for fields of `global_state::Globals`.
///
/// ```ignore
/// global_signals! {
///     pub is_loading => is_loading: bool,
///     load_percent => load_percent: Option<u8>,
/// }
/// ```
#[macro_export]
macro_rules! global_signals {
    ( $( $vis:vis $name:ident => $field:ident : $ty:ty ),+ $(,)? ) => {
        $(
            $vis fn $name() -> ::leptos::RwSignal<$ty> {
                $crate::global_state::globals().$field
            }
        )+
    };
}
