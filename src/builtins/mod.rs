//! Built-in types - the object model's variant operations
//!
//! Design: Free functions per variant, each checking the header tag before
//! doing any work. Every variable-length container is built on `seglist`.

pub mod seglist;
pub mod list;
pub mod dict;
pub mod tuple;
pub mod string;
pub mod int;
pub mod function;
pub mod slice;
pub mod class;
pub mod print;


pub use seglist::{
    seglist_append, seglist_clear, seglist_get, seglist_insert, seglist_len, seglist_new,
    seglist_remove, seglist_segment_count, seglist_set, seglist_to_vec, SEGMENT_CAPACITY,
};
pub use list::{
    list_append, list_clear, list_copy, list_get_item, list_get_slice, list_index, list_insert,
    list_len, list_new, list_print, list_remove, list_remove_index, list_replicate, list_set_item,
    list_store_slice, list_subscript_slice, list_to_vec,
};
pub use dict::{
    dict_clear, dict_del_item, dict_entry, dict_get_item, dict_keys, dict_len, dict_lookup,
    dict_lookup_str, dict_new, dict_set_item, dict_vals,
};
pub use tuple::{tuple_get_item, tuple_items, tuple_len, tuple_new};
pub use string::{string_as_str, string_equals, string_new};
pub use int::{int_new, int_value};
pub use function::{function_data, function_new};
pub use slice::{slice_data, slice_indices, slice_new, slice_print};
pub use class::{
    class_attrs, class_create, class_get_attr, class_name, class_new_instance, class_set_attr,
    method_call_args, method_data, method_new,
};
pub use print::{obj_print, obj_to_string, Output, PlatformOutput};
