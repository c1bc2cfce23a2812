use crate::plan::textures::TexturePlan;
use serde::Serialize;

/// Inputs of the standard surface shader a texture can feed directly
pub const SURFACE_INPUTS: &[&str] = &[
    "base",
    "base_color",
    "diffuse_roughness",
    "metalness",
    "specular",
    "specular_color",
    "specular_roughness",
    "specular_IOR",
    "specular_anisotropy",
    "specular_rotation",
    "transmission",
    "transmission_color",
    "transmission_depth",
    "transmission_scatter",
    "transmission_scatter_anisotropy",
    "transmission_dispersion",
    "transmission_extra_roughness",
    "subsurface",
    "subsurface_color",
    "subsurface_radius",
    "subsurface_scale",
    "subsurface_anisotropy",
    "sheen",
    "sheen_color",
    "sheen_roughness",
    "coat",
    "coat_color",
    "coat_roughness",
    "coat_anisotropy",
    "coat_rotation",
    "coat_IOR",
    "coat_normal",
    "coat_affect_color",
    "coat_affect_roughness",
    "thin_film_thickness",
    "thin_film_IOR",
    "emission",
    "emission_color",
    "opacity",
    "thin_walled",
    "normal",
    "tangent",
];

/// Displacement shader scale; heights are first remapped to `[-0.5, 0.5]`
pub const DISPLACEMENT_SCALE: f64 = 0.01;

/// Where a texture image is connected
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShaderTarget {
    /// Straight into a surface input
    Surface {
        /// Input name
        input: String,
    },
    /// Through a normal-map node into the surface `normal` input
    NormalMap,
    /// Float image through a remap into the displacement shader
    Displacement {
        /// Remap output low
        out_low: f64,
        /// Remap output high
        out_high: f64,
        /// Displacement scale
        scale: f64,
    },
    /// Not connected; grouped under "Textures Not Used"
    Unused,
}

/// One image node and its connection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderBinding {
    /// Image node name (the channel name)
    pub node: String,
    /// Texture file
    pub file: String,
    /// Image output signature
    pub signature: &'static str,
    /// Connection
    pub target: ShaderTarget,
}

/// Shader network wiring for one asset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShaderPlan {
    /// Index label of the asset
    pub asset: String,
    /// Image nodes in creation order
    pub bindings: Vec<ShaderBinding>,
}

impl ShaderPlan {
    /// Image nodes that end up unconnected
    pub fn unused(&self) -> impl Iterator<Item = &ShaderBinding> {
        self.bindings
            .iter()
            .filter(|b| matches!(b.target, ShaderTarget::Unused))
    }
}

/// Route each chosen texture into the surface shader network
#[must_use]
pub fn plan_shader(textures: &TexturePlan) -> ShaderPlan {
    let bindings = textures
        .assignments
        .iter()
        .map(|a| {
            let target = target_for(&a.channel);
            let signature = if matches!(target, ShaderTarget::Displacement { .. }) {
                "float"
            } else {
                "color3"
            };
            ShaderBinding {
                node: a.channel.clone(),
                file: a.path.clone(),
                signature,
                target,
            }
        })
        .collect();
    ShaderPlan {
        asset: textures.asset.clone(),
        bindings,
    }
}

fn target_for(channel: &str) -> ShaderTarget {
    let lower = channel.to_lowercase();
    match lower.as_str() {
        "albedo" => ShaderTarget::Surface {
            input: "base_color".to_string(),
        },
        "roughness" => ShaderTarget::Surface {
            input: "specular_roughness".to_string(),
        },
        "normal" => ShaderTarget::NormalMap,
        "displacement" => ShaderTarget::Displacement {
            out_low: -0.5,
            out_high: 0.5,
            scale: DISPLACEMENT_SCALE,
        },
        other => SURFACE_INPUTS
            .iter()
            .find(|input| input.eq_ignore_ascii_case(other))
            .map_or(ShaderTarget::Unused, |input| ShaderTarget::Surface {
                input: (*input).to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::textures::TextureAssignment;

    fn plan_for(channels: &[&str]) -> ShaderPlan {
        let textures = TexturePlan {
            asset: "3d::Rock::abc".into(),
            resolution: "2048x2048".into(),
            assignments: channels
                .iter()
                .map(|c| TextureAssignment {
                    channel: (*c).to_string(),
                    path: format!("/t/{c}.rat"),
                })
                .collect(),
            ..TexturePlan::default()
        };
        plan_shader(&textures)
    }

    #[test]
    fn well_known_channels() {
        let plan = plan_for(&["Albedo", "Roughness", "Normal", "Displacement"]);
        let targets: Vec<_> = plan.bindings.iter().map(|b| &b.target).collect();
        assert_eq!(
            targets,
            vec![
                &ShaderTarget::Surface { input: "base_color".into() },
                &ShaderTarget::Surface { input: "specular_roughness".into() },
                &ShaderTarget::NormalMap,
                &ShaderTarget::Displacement { out_low: -0.5, out_high: 0.5, scale: 0.01 },
            ]
        );
        assert_eq!(plan.bindings[3].signature, "float");
        assert_eq!(plan.bindings[0].signature, "color3");
    }

    #[test]
    fn surface_named_channels_connect_directly() {
        let plan = plan_for(&["Opacity", "Metalness", "Specular"]);
        for binding in &plan.bindings {
            assert_eq!(
                binding.target,
                ShaderTarget::Surface { input: binding.node.to_lowercase() }
            );
        }
    }

    #[test]
    fn other_channels_are_unused() {
        let plan = plan_for(&["AO", "Cavity", "Translucency", "Albedo"]);
        let unused: Vec<_> = plan.unused().map(|b| b.node.as_str()).collect();
        assert_eq!(unused, vec!["AO", "Cavity", "Translucency"]);
    }

    #[test]
    fn serializes_tagged_targets() {
        let plan = plan_for(&["Normal"]);
        let value = serde_json::to_value(&plan).unwrap();
        assert_eq!(value["bindings"][0]["target"]["kind"], "normal_map");
        assert_eq!(value["bindings"][0]["file"], "/t/Normal.rat");
    }
}
