mod arena;
mod avl;
mod red_black;
mod skip_list;
mod splay;

pub(crate) use avl::RawAvlMap;
pub(crate) use red_black::RawRedBlackMap;
pub(crate) use skip_list::{DEFAULT_MAX_LEVEL, RawSkipListMap};
pub(crate) use splay::RawSplayMap;
