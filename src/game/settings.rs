// Tunable constants for rail maintenance and cart collisions

/// Rail maintenance settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RailSettings {
    /// Damage dealt to a rail whose supporting block was destroyed
    pub support_damage: i32,
}

pub const RAIL_SETTINGS: RailSettings = RailSettings {
    // Enough to destroy any rail outright
    support_damage: 1000,
};

impl Default for RailSettings {
    fn default() -> Self {
        RAIL_SETTINGS
    }
}

/// Collision response settings for rail vehicles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpulseSettings {
    /// Mass assumed for any character a cart runs into
    pub character_mass: f32,
    /// Baumgarte stabilization coefficient
    pub baumgarte: f32,
    /// Added to every axis of the cart-to-cart separation before normalizing
    pub separation_epsilon: f32,
}

pub const IMPULSE_SETTINGS: ImpulseSettings = ImpulseSettings {
    character_mass: 20.0,
    baumgarte: 0.2,
    // Smallest positive subnormal
    separation_epsilon: f32::from_bits(1),
};

impl Default for ImpulseSettings {
    fn default() -> Self {
        IMPULSE_SETTINGS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        assert_eq!(RailSettings::default().support_damage, 1000);
        let impulse = ImpulseSettings::default();
        assert_eq!(impulse.character_mass, 20.0);
        assert_eq!(impulse.baumgarte, 0.2);
        assert!(impulse.separation_epsilon > 0.0);
        assert!(impulse.separation_epsilon < f32::MIN_POSITIVE);
        assert_eq!(impulse.separation_epsilon.to_bits(), 1);
    }
}
