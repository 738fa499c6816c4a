mod arena;
mod handle;
mod node;
mod raw_avl_tree;
mod walk;

pub(crate) use handle::Handle;
pub(crate) use raw_avl_tree::RawAvlTree;
pub(crate) use walk::InOrderWalk;
