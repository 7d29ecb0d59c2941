macro_rules! nutype_string {
    ($ident:ident($($arg:ident $(( $($inner:tt)* ))?),* $(,)?)) => {
        #[::nutype::nutype(
            $($arg $(( $($inner)* ))?,)*
            derive(Debug, Display, Clone, PartialEq, Eq, Hash, Deref, TryFrom, Serialize, Deserialize)
        )]
        pub struct $ident(String);
    };
}

pub(crate) use nutype_string;
