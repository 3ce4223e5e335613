use clap::Parser;

/// Loads a glTF scene onto the GPU and reports how many render primitives
/// could be shared between mesh instances
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the .gltf or .glb file of the asset that will be loaded
    pub gltf: String,

    /// Index of the scene to load; defaults to the asset's default scene
    #[arg(short = 's', long)]
    pub scene: Option<usize>,

    /// Number of times the scene is instantiated
    #[arg(
        short = 'n',
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    pub instances: u32,
}

impl From<Cli> for primitive_cache::args::Args {
    fn from(value: Cli) -> Self {
        primitive_cache::args::Args {
            gltf: value.gltf,
            scene: value.scene,
            instances: value.instances,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instances_default_to_one() {
        let cli = Cli::try_parse_from(["primitive_cache", "scene.gltf"]).unwrap();
        assert_eq!(cli.gltf, "scene.gltf");
        assert_eq!(cli.scene, None);
        assert_eq!(cli.instances, 1);
    }

    #[test]
    fn scene_and_instances_are_parsed() {
        let cli =
            Cli::try_parse_from(["primitive_cache", "-s", "2", "--instances", "8", "a.glb"])
                .unwrap();
        assert_eq!(cli.scene, Some(2));
        assert_eq!(cli.instances, 8);
    }

    #[test]
    fn zero_instances_are_rejected() {
        assert!(Cli::try_parse_from(["primitive_cache", "-n", "0", "a.glb"]).is_err());
    }
}
