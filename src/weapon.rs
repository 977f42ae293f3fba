//! Equipped item identifiers.

use hashbrown::HashSet;
use once_cell::sync::Lazy;

/// Item definition index of the viewer's active weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeaponId(pub i32);

impl WeaponId {
    /// Nothing resolved.
    pub const INVALID: Self = Self(-1);
    /// Item `deagle`.
    pub const DEAGLE: Self = Self(1);
    /// Item `ak47`.
    pub const AK47: Self = Self(7);
    /// Item `awp`.
    pub const AWP: Self = Self(9);
    /// Item `m4a1`.
    pub const M4A1: Self = Self(16);
    /// Item `knife gg`.
    pub const KNIFE_GG: Self = Self(41);
    /// Item `knife`.
    pub const KNIFE: Self = Self(42);
    /// Item `flashbang`.
    pub const FLASHBANG: Self = Self(43);
    /// Item `he grenade`.
    pub const HE_GRENADE: Self = Self(44);
    /// Item `smoke grenade`.
    pub const SMOKE_GRENADE: Self = Self(45);
    /// Item `molotov`.
    pub const MOLOTOV: Self = Self(46);
    /// Item `decoy`.
    pub const DECOY: Self = Self(47);
    /// Item `inc grenade`.
    pub const INC_GRENADE: Self = Self(48);
    /// Item `knife t`.
    pub const KNIFE_T: Self = Self(59);
    /// Item `knife ghost`.
    pub const KNIFE_GHOST: Self = Self(80);
    /// Item `bayonet`.
    pub const BAYONET: Self = Self(500);
    /// Item `knife flip`.
    pub const KNIFE_FLIP: Self = Self(505);
    /// Item `knife gut`.
    pub const KNIFE_GUT: Self = Self(506);
    /// Item `knife karambit`.
    pub const KNIFE_KARAMBIT: Self = Self(507);
    /// Item `knife m9 bayonet`.
    pub const KNIFE_M9_BAYONET: Self = Self(508);
    /// Item `knife tactical`.
    pub const KNIFE_TACTICAL: Self = Self(509);
    /// Item `knife falchion`.
    pub const KNIFE_FALCHION: Self = Self(512);
    /// Item `knife survival bowie`.
    pub const KNIFE_SURVIVAL_BOWIE: Self = Self(514);
    /// Item `knife butterfly`.
    pub const KNIFE_BUTTERFLY: Self = Self(515);
    /// Item `knife push`.
    pub const KNIFE_PUSH: Self = Self(516);
    /// Item `knife ursus`.
    pub const KNIFE_URSUS: Self = Self(519);
    /// Item `knife gypsy jackknife`.
    pub const KNIFE_GYPSY_JACKKNIFE: Self = Self(520);
    /// Item `knife stiletto`.
    pub const KNIFE_STILETTO: Self = Self(522);
    /// Item `knife widowmaker`.
    pub const KNIFE_WIDOWMAKER: Self = Self(523);

    /// Returns `true` for melee and thrown items, which never arm steering.
    ///
    /// # Examples
    /// ```
    /// use sightline::weapon::WeaponId;
    /// assert!(WeaponId::KNIFE_KARAMBIT.is_disallowed());
    /// assert!(WeaponId::SMOKE_GRENADE.is_disallowed());
    /// assert!(!WeaponId::AK47.is_disallowed());
    /// ```
    #[must_use]
    pub fn is_disallowed(self) -> bool {
        DISALLOWED.contains(&self)
    }
}

impl Default for WeaponId {
    fn default() -> Self {
        Self::INVALID
    }
}

static DISALLOWED: Lazy<HashSet<WeaponId>> = Lazy::new(|| {
    [
        WeaponId::KNIFE_GG,
        WeaponId::KNIFE,
        WeaponId::FLASHBANG,
        WeaponId::HE_GRENADE,
        WeaponId::SMOKE_GRENADE,
        WeaponId::MOLOTOV,
        WeaponId::DECOY,
        WeaponId::INC_GRENADE,
        WeaponId::KNIFE_T,
        WeaponId::KNIFE_GHOST,
        WeaponId::BAYONET,
        WeaponId::KNIFE_FLIP,
        WeaponId::KNIFE_GUT,
        WeaponId::KNIFE_KARAMBIT,
        WeaponId::KNIFE_M9_BAYONET,
        WeaponId::KNIFE_TACTICAL,
        WeaponId::KNIFE_FALCHION,
        WeaponId::KNIFE_SURVIVAL_BOWIE,
        WeaponId::KNIFE_BUTTERFLY,
        WeaponId::KNIFE_PUSH,
        WeaponId::KNIFE_URSUS,
        WeaponId::KNIFE_GYPSY_JACKKNIFE,
        WeaponId::KNIFE_STILETTO,
        WeaponId::KNIFE_WIDOWMAKER,
    ]
    .into_iter()
    .collect()
});
