use bitflags::bitflags;

bitflags! {
    /// On-board components implied by the cartridge type byte (0x147).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FeatureFlags: u8 {
        const RAM     = 0b0000_0001;
        const BATTERY = 0b0000_0010;
        const TIMER   = 0b0000_0100;
        const RUMBLE  = 0b0000_1000;
    }
}

impl FeatureFlags {
    /// Components for a cartridge type code. Total over all 256 codes; codes
    /// without a known description report nothing.
    pub const fn classify(cartridge_type: u8) -> Self {
        let mut flags = Self::empty();
        // MBC2 (0x05, 0x06) carries 512x4 bits of internal RAM that its
        // description does not mention.
        if matches!(
            cartridge_type,
            0x02 | 0x03
                | 0x05
                | 0x06
                | 0x08
                | 0x09
                | 0x0C
                | 0x0D
                | 0x10
                | 0x12
                | 0x13
                | 0x1A
                | 0x1B
                | 0x1D
                | 0x1E
                | 0x22
                | 0xFF
        ) {
            flags = flags.union(Self::RAM);
        }
        if matches!(
            cartridge_type,
            0x03 | 0x06 | 0x09 | 0x0D | 0x0F | 0x10 | 0x13 | 0x1B | 0x1E | 0x22 | 0xFF
        ) {
            flags = flags.union(Self::BATTERY);
        }
        if matches!(cartridge_type, 0x0F | 0x10) {
            flags = flags.union(Self::TIMER);
        }
        if matches!(cartridge_type, 0x1C | 0x1D | 0x1E | 0x22) {
            flags = flags.union(Self::RUMBLE);
        }
        flags
    }

    pub fn has_ram(self) -> bool {
        self.contains(Self::RAM)
    }

    pub fn has_battery(self) -> bool {
        self.contains(Self::BATTERY)
    }

    pub fn has_timer(self) -> bool {
        self.contains(Self::TIMER)
    }

    pub fn has_rumble(self) -> bool {
        self.contains(Self::RUMBLE)
    }
}
