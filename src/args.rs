pub struct Args {
    pub gltf: String,
    pub scene: Option<usize>,
    pub instances: u32,
}
