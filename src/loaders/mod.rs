pub mod assets;
pub mod gltf;
pub mod obj;
pub mod texture;

pub use assets::{AssetLoader, ModelRequest, ModelSource};
pub use self::gltf::load_gltf_file;
pub use obj::load_obj;
pub use texture::{decode_bytes, decode_file, TextureLoader};
