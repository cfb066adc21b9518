//! Declarative macros for the SDP document model
//!
//! The grammar stores every captured line into either a typed record (for
//! rules with named fields) or a bare [`Value`](super::Value). Two macros keep
//! the record shapes and the section layout in one place:
//!
//! - `sdp_record!` declares a record struct and its [`Record`](super::records::Record)
//!   impl. Fields are captured in declaration order, so the field list of the
//!   struct *is* the ordered field-name list of the matching grammar rule.
//! - `section_fields!` declares the [`Slot`](super::Slot) enum, the
//!   [`Fields`](super::Fields) struct shared by the session and every media
//!   section, and the glue that stores captures into a slot and reads them
//!   back out for the writer.

/// Declares an SDP record struct whose fields map positionally onto the
/// capture groups of a grammar rule.
///
/// Required fields are typed `Value`; fields captured by an optional group
/// are typed `Option<Value>`.
macro_rules! sdp_record {
    (
        $(#[$meta:meta])*
        pub struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                pub $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default, rename_all = "camelCase")]
        pub struct $name {
            $(
                $(#[$field_meta])*
                pub $field: $ty,
            )*
        }

        impl $crate::sdp::records::Record for $name {
            fn from_captures(values: Vec<Option<$crate::sdp::Value>>) -> Self {
                let mut values = values.into_iter();
                $name {
                    $(
                        $field: $crate::sdp::records::FieldValue::from_capture(
                            values.next().flatten(),
                        ),
                    )*
                }
            }

            fn to_args(&self) -> Vec<Option<$crate::sdp::Value>> {
                vec![$($crate::sdp::records::FieldValue::to_arg(&self.$field)),*]
            }
        }
    };
}

/// Declares the storage slots of a section.
///
/// Singletons hold at most one record per section and are overwritten by a
/// later line of the same kind; lists accumulate one record per line.
/// Codec lists behave like lists but are serialized even when empty.
macro_rules! section_fields {
    (
        singletons {
            $(
                $(#[$s_meta:meta])*
                $s_slot:ident => $s_field:ident : $s_ty:ty = $s_key:literal,
            )*
        }
        codec_lists {
            $(
                $(#[$c_meta:meta])*
                $c_slot:ident => $c_field:ident : $c_ty:ty = $c_key:literal,
            )*
        }
        lists {
            $(
                $(#[$l_meta:meta])*
                $l_slot:ident => $l_field:ident : $l_ty:ty = $l_key:literal,
            )*
        }
    ) => {
        /// Where a grammar rule stores what it captures
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Slot {
            $($s_slot,)*
            $($c_slot,)*
            $($l_slot,)*
        }

        impl Slot {
            /// The key this slot is known by in the JSON document
            pub fn key(self) -> &'static str {
                match self {
                    $(Slot::$s_slot => $s_key,)*
                    $(Slot::$c_slot => $c_key,)*
                    $(Slot::$l_slot => $l_key,)*
                }
            }

            /// True for slots holding an ordered list of records
            pub fn is_list(self) -> bool {
                match self {
                    $(Slot::$s_slot => false,)*
                    $(Slot::$c_slot => true,)*
                    $(Slot::$l_slot => true,)*
                }
            }
        }

        /// Lines recorded at one location: the session root or a media section
        #[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
        #[serde(default)]
        pub struct Fields {
            $(
                $(#[$s_meta])*
                #[serde(rename = $s_key, skip_serializing_if = "Option::is_none")]
                pub $s_field: Option<$s_ty>,
            )*
            $(
                $(#[$c_meta])*
                #[serde(rename = $c_key)]
                pub $c_field: Vec<$c_ty>,
            )*
            $(
                $(#[$l_meta])*
                #[serde(rename = $l_key, skip_serializing_if = "Vec::is_empty")]
                pub $l_field: Vec<$l_ty>,
            )*
        }

        impl Fields {
            /// Store one matched line. Singletons are replaced, lists appended.
            pub(crate) fn store(&mut self, slot: Slot, values: Vec<Option<$crate::sdp::Value>>) {
                use $crate::sdp::records::Record;
                match slot {
                    $(Slot::$s_slot => self.$s_field = Some(<$s_ty as Record>::from_captures(values)),)*
                    $(Slot::$c_slot => self.$c_field.push(<$c_ty as Record>::from_captures(values)),)*
                    $(Slot::$l_slot => self.$l_field.push(<$l_ty as Record>::from_captures(values)),)*
                }
            }

            /// Positional arguments for every line the slot currently holds
            pub(crate) fn emit(&self, slot: Slot) -> Vec<Vec<Option<$crate::sdp::Value>>> {
                use $crate::sdp::records::Record;
                match slot {
                    $(Slot::$s_slot => self.$s_field.iter().map(Record::to_args).collect(),)*
                    $(Slot::$c_slot => self.$c_field.iter().map(Record::to_args).collect(),)*
                    $(Slot::$l_slot => self.$l_field.iter().map(Record::to_args).collect(),)*
                }
            }
        }
    };
}
