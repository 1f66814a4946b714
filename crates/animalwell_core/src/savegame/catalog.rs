use crate::label::label_enum;

label_enum! {
    /// Item in the equip slot.
    pub enum Equipped: "equipped item" {
        Empty = (0x0, "none", "None"),
        Firecracker = (0x1, "firecracker", "Firecracker"),
        Flute = (0x2, "flute", "Flute"),
        Lantern = (0x3, "lantern", "Lantern"),
        Top = (0x4, "top", "Top"),
        Disc = (0x5, "disc", "Disc"),
        Wand = (0x6, "wand", "B. Wand"),
        Yoyo = (0x7, "yoyo", "Yoyo"),
        Slink = (0x8, "slink", "Slink"),
        Remote = (0x9, "remote", "Remote"),
        Ball = (0xA, "ball", "Ball"),
        Wheel = (0xB, "wheel", "Wheel"),
        UvLight = (0xC, "uvlight", "UV Light"),
    }
}

label_enum! {
    pub enum Equipment: "equipment" {
        Firecracker = (0x0002, "firecracker", "Firecracker"),
        Flute = (0x0004, "flute", "Flute"),
        Lantern = (0x0008, "lantern", "Lantern"),
        Top = (0x0010, "top", "Top"),
        Disc = (0x0020, "disc", "Disc"),
        Wand = (0x0040, "wand", "B. Wand"),
        Yoyo = (0x0080, "yoyo", "Yoyo"),
        Slink = (0x0100, "slink", "Slink"),
        Remote = (0x0200, "remote", "Remote"),
        Ball = (0x0400, "ball", "Ball"),
        Wheel = (0x0800, "wheel", "Wheel"),
        UvLight = (0x1000, "uvlight", "UV Light"),
    }
}

label_enum! {
    pub enum Inventory: "inventory item" {
        MockDisc = (0x01, "mock_disc", "Mock Disc"),
        SMedal = (0x02, "s_medal", "S. Medal"),
        HouseKey = (0x08, "house_key", "House Key"),
        OfficeKey = (0x10, "office_key", "Office Key"),
        EMedal = (0x40, "e_medal", "E. Medal"),
        Pack = (0x80, "pack", "F. Pack"),
    }
}

label_enum! {
    pub enum QuestState: "quest state" {
        HouseOpen = (0x0000_0001, "house_open", "House Open"),
        OfficeOpen = (0x0000_0002, "office_open", "Office Open"),
        ClosetOpen = (0x0000_0004, "closet_open", "Closet Open"),
        UnlockMap = (0x0000_0200, "unlock_map", "Map Unlocked"),
        UnlockStamps = (0x0000_0400, "unlock_stamps", "Stamps Unlocked"),
        UnlockPencil = (0x0000_0800, "unlock_pencil", "Pencil Unlocked"),
        DefeatedChameleon = (0x0000_1000, "defeated_chameleon", "Defeated Chameleon"),
        CRing = (0x0000_2000, "cring", "Cheater's Ring"),
        UsedSMedal = (0x0000_8000, "used_s_medal", "Inserted S. Medal"),
        UsedEMedal = (0x0001_0000, "used_e_medal", "Inserted E. Medal"),
        Wings = (0x0002_0000, "wings", "Wings / Flying Unlocked"),
        BbWand = (0x0008_0000, "bb_wand", "B.B. Wand Upgrade"),
        Egg65 = (0x0010_0000, "egg_65", "Egg 65"),
        Torus = (0x0040_0000, "torus", "Teleport Torus Active"),
        DefeatedBat = (0x0100_0000, "defeated_bat", "Defeated Bat"),
        FreedOstrich = (0x0200_0000, "freed_ostrich", "Freed Wheel Ostrich"),
        DefeatedOstrich = (0x0400_0000, "defeated_ostrich", "Defeated Wheel Ostrich"),
        FightingEel = (0x0800_0000, "fighting_eel", "Fighting Eel"),
        DefeatedEel = (0x1000_0000, "defeated_eel", "Defeated Eel"),
        ShrineNoDisc = (0x2000_0000, "shrine_no_disc", "No Disc in Dog Shrine"),
        StatueNoDisc = (0x4000_0000, "statue_no_disc", "No Disc in Dog Head Statue"),
    }
}

label_enum! {
    pub enum Egg: "egg" {
        Reference = (1 << 0, "reference", "Reference"),
        Brown = (1 << 1, "brown", "Brown"),
        Raw = (1 << 2, "raw", "Raw"),
        Pickled = (1 << 3, "pickled", "Pickled"),
        Big = (1 << 4, "big", "Big"),
        Swan = (1 << 5, "swan", "Swan"),
        Forbidden = (1 << 6, "forbidden", "Forbidden"),
        Shadow = (1 << 7, "shadow", "Shadow"),
        Vanity = (1 << 8, "vanity", "Vanity"),
        Service = (1 << 9, "service", "Egg as a Service"),
        Depraved = (1 << 10, "depraved", "Depraved"),
        Chaos = (1 << 11, "chaos", "Chaos"),
        UpsideDown = (1 << 12, "upside_down", "Upside Down"),
        Evil = (1 << 13, "evil", "Evil"),
        Sweet = (1 << 14, "sweet", "Sweet"),
        Chocolate = (1 << 15, "chocolate", "Chocolate"),
        Value = (1 << 16, "value", "Value"),
        Plant = (1 << 17, "plant", "Plant"),
        Red = (1 << 18, "red", "Red"),
        Orange = (1 << 19, "orange", "Orange"),
        Sour = (1 << 20, "sour", "Sour"),
        PostModern = (1 << 21, "post_modern", "Post Modern"),
        UniversalBasic = (1 << 22, "universal_basic", "Universal Basic"),
        LaissezFaire = (1 << 23, "laissez_faire", "Laissez-Faire"),
        Zen = (1 << 24, "zen", "Zen"),
        Future = (1 << 25, "future", "Future"),
        Friendship = (1 << 26, "friendship", "Friendship"),
        Truth = (1 << 27, "truth", "Truth"),
        Transcendental = (1 << 28, "transcendental", "Transcendental"),
        Ancient = (1 << 29, "ancient", "Ancient"),
        Magic = (1 << 30, "magic", "Magic"),
        Mystic = (1 << 31, "mystic", "Mystic"),
        Holiday = (1 << 32, "holiday", "Holiday"),
        Rain = (1 << 33, "rain", "Rain"),
        Razzle = (1 << 34, "razzle", "Razzle"),
        Dazzle = (1 << 35, "dazzle", "Dazzle"),
        Virtual = (1 << 36, "virtual", "Virtual"),
        Normal = (1 << 37, "normal", "Normal"),
        Great = (1 << 38, "great", "Great"),
        Gorgeous = (1 << 39, "gorgeous", "Gorgeous"),
        Planet = (1 << 40, "planet", "Planet"),
        Moon = (1 << 41, "moon", "Moon"),
        Galaxy = (1 << 42, "galaxy", "Galaxy"),
        Sunset = (1 << 43, "sunset", "Sunset"),
        Goodnight = (1 << 44, "goodnight", "Goodnight"),
        Dream = (1 << 45, "dream", "Dream"),
        Travel = (1 << 46, "travel", "Travel"),
        Promise = (1 << 47, "promise", "Promise"),
        Ice = (1 << 48, "ice", "Ice"),
        Fire = (1 << 49, "fire", "Fire"),
        Bubble = (1 << 50, "bubble", "Bubble"),
        Desert = (1 << 51, "desert", "Desert"),
        Clover = (1 << 52, "clover", "Clover"),
        Brick = (1 << 53, "brick", "Brick"),
        Neon = (1 << 54, "neon", "Neon"),
        Iridescent = (1 << 55, "iridescent", "Iridescent"),
        Rust = (1 << 56, "rust", "Rust"),
        Scarlet = (1 << 57, "scarlet", "Scarlet"),
        Sapphire = (1 << 58, "sapphire", "Sapphire"),
        Ruby = (1 << 59, "ruby", "Ruby"),
        Jade = (1 << 60, "jade", "Jade"),
        Obsidian = (1 << 61, "obsidian", "Obsidian"),
        Crystal = (1 << 62, "crystal", "Crystal"),
        Golden = (1 << 63, "golden", "Golden"),
    }
}

label_enum! {
    pub enum Bunny: "bunny" {
        Tutorial = (0x0000_0001, "tutorial", "Tutorial"),
        Origami = (0x0000_0004, "origami", "Origami"),
        Crow = (0x0000_0008, "crow", "Crow"),
        Ghost = (0x0000_0010, "ghost", "Ghost"),
        FishMural = (0x0000_0040, "fish_mural", "Fish Mural"),
        Map = (0x0000_0080, "map", "Map Numbers"),
        Tv = (0x0000_0100, "tv", "TV"),
        Uv = (0x0000_0200, "uv", "UV"),
        Bulb = (0x0000_0400, "bulb", "Bulb"),
        Chinchilla = (0x0000_0800, "chinchilla", "Chinchilla"),
        BunnyMural = (0x0000_8000, "bunny_mural", "Bunny Mural"),
        Duck = (0x0040_0000, "duck", "Duck"),
        GhostDog = (0x0200_0000, "ghost_dog", "Ghost Dog"),
        Dream = (0x1000_0000, "dream", "Dream"),
        FloorIsLava = (0x4000_0000, "floor_is_lava", "Floor Is Lava"),
        SpikeRoom = (0x8000_0000, "spike_room", "Spike Room"),
    }
}

label_enum! {
    /// Bunnies that break the final puzzle when collected. Stored in the
    /// same word as [`Bunny`].
    pub enum IllegalBunny: "illegal bunny" {
        Ill01 = (0x0000_0002, "ill_01", "Illegal 1"),
        Ill02 = (0x0000_0020, "ill_02", "Illegal 2"),
        Ill03 = (0x0000_1000, "ill_03", "Illegal 3"),
        Ill04 = (0x0000_2000, "ill_04", "Illegal 4"),
        Ill05 = (0x0000_4000, "ill_05", "Illegal 5"),
        Ill06 = (0x0001_0000, "ill_06", "Illegal 6"),
        Ill07 = (0x0002_0000, "ill_07", "Illegal 7"),
        Ill08 = (0x0004_0000, "ill_08", "Illegal 8"),
        Ill09 = (0x0008_0000, "ill_09", "Illegal 9"),
        Ill10 = (0x0010_0000, "ill_10", "Illegal 10"),
        Ill11 = (0x0020_0000, "ill_11", "Illegal 11"),
        Ill12 = (0x0080_0000, "ill_12", "Illegal 12"),
        Ill13 = (0x0100_0000, "ill_13", "Illegal 13"),
        Ill14 = (0x0400_0000, "ill_14", "Illegal 14"),
        Ill15 = (0x0800_0000, "ill_15", "Illegal 15"),
        Ill16 = (0x2000_0000, "ill_16", "Illegal 16"),
    }
}

label_enum! {
    pub enum EggDoor: "egg door" {
        First = (0x1, "first", "First (Flute, Portal)"),
        Second = (0x2, "second", "Second (Pencil)"),
        Third = (0x4, "third", "Third (Top)"),
        Fourth = (0x8, "fourth", "Fourth (65th Egg)"),
    }
}

label_enum! {
    pub enum Teleport: "teleport" {
        Frog = (0x02, "frog", "Frog"),
        Fish = (0x04, "fish", "Fish"),
        Bear = (0x08, "bear", "Bear"),
        Dog = (0x10, "dog", "Dog"),
        Bird = (0x20, "bird", "Bird"),
        Squirrel = (0x40, "squirrel", "Squirrel"),
        Hippo = (0x80, "hippo", "Hippo"),
    }
}

label_enum! {
    pub enum FlameState: "flame state" {
        Sealed = (0, "sealed", "Sealed"),
        Cracked1 = (1, "cracked_1", "Glass Cracked"),
        Cracked2 = (2, "cracked_2", "Glass Cracked More"),
        Broken = (3, "broken", "Glass Broken"),
        Collected = (4, "collected", "Collected"),
        Used = (5, "used", "Used"),
    }
}

label_enum! {
    /// Lit candles, named by room coordinate.
    pub enum CandleState: "candle" {
        Room04x06 = (0x001, "room_04_06", "Room (4, 6)"),
        Room08x06 = (0x002, "room_08_06", "Room (8, 6)"),
        Room04x07 = (0x004, "room_04_07", "Room (4, 7)"),
        Room06x07 = (0x008, "room_06_07", "Room (6, 7)"),
        Room06x09 = (0x010, "room_06_09", "Room (6, 9)"),
        Room15x09 = (0x020, "room_15_09", "Room (15, 9)"),
        Room05x13 = (0x040, "room_05_13", "Room (5, 13)"),
        Room10x13 = (0x080, "room_10_13", "Room (10, 13)"),
        Room16x13 = (0x100, "room_16_13", "Room (16, 13)"),
    }
}

label_enum! {
    pub enum StampIcon: "stamp icon" {
        Chest = (0, "chest", "Chest"),
        Heart = (1, "heart", "Heart"),
        Skull = (2, "skull", "Skull"),
        Diamond = (3, "diamond", "Diamond"),
        Spiral = (4, "spiral", "Spiral"),
        Flame = (5, "flame", "Flame"),
        Grid = (6, "grid", "Grid"),
        Question = (7, "question", "Question"),
    }
}

label_enum! {
    /// Unlockables stored outside the slots.
    pub enum Unlockable: "unlockable" {
        Stopwatch = (0x00001, "stopwatch", "Stopwatch"),
        Pedometer = (0x00002, "pedometer", "Pedometer"),
        PinkPhone = (0x00004, "pink_phone", "Pink Phone"),
        SouvenirCup = (0x00008, "souvenir_cup", "Souvenir Cup"),
        Origami = (0x00010, "origami", "Origami Figurines"),
        TwoRabbits = (0x00020, "two_rabbits", "Two Rabbits"),
        Owl = (0x00040, "owl", "Owl Figurine"),
        Cat = (0x00080, "cat", "Cat Figurine"),
        Fish = (0x00100, "fish", "Fish Figurine"),
        Donkey = (0x00200, "donkey", "Donkey Figurine"),
        DecoRabbit = (0x00400, "deco_rabbit", "Decorative Rabbit"),
        MamaCha = (0x00800, "mama_cha", "mama cha"),
        Giraffe = (0x01000, "giraffe", "Giraffe Figurine"),
        Incense = (0x02000, "incense", "Incense Burner"),
        Peacock = (0x04000, "peacock", "Peacock Figurine"),
        Otter = (0x08000, "otter", "Otter Figurine"),
        Duck = (0x10000, "duck", "Duck Figurine"),
        PedometerUnicode = (0x40000, "pedometer_unicode", "Pedometer Unicode Chest"),
    }
}

label_enum! {
    /// Pink buttons that are safe to press.
    pub enum PinkButton: "pink button" {
        Spike = (0x002, "spike", "Spike Bunny"),
        FloorIsLava = (0x004, "floor_is_lava", "Floor Is Lava Bunny"),
        MapNumber = (0x010, "map_number", "Map Number Bunny"),
        DogWheel = (0x020, "dog_wheel", "Elevator Dog Wheel"),
        Chinchilla = (0x040, "chinchilla", "Chinchilla Bunny"),
        Bulb = (0x080, "bulb", "Bulb Bunny"),
        Portal = (0x200, "portal", "Lower Portal Nexus"),
    }
}

label_enum! {
    /// Pink buttons tied to illegal bunnies. Only ever cleared.
    pub enum PinkButtonInvalid: "invalid pink button" {
        Ill01 = (0x001, "ill_01", "Illegal Bunny 1"),
        Ill02 = (0x008, "ill_02", "Illegal Bunny 2"),
        Ill03 = (0x100, "ill_03", "Illegal Bunny 3"),
    }
}

label_enum! {
    pub enum CatStatus: "cat" {
        Cat16x18a = (0x01, "cat_16_18_1", "Caged Cat 1 at 16,18"),
        Cat16x18b = (0x02, "cat_16_18_2", "Caged Cat 2 at 16,18"),
        Cat16x18c = (0x04, "cat_16_18_3", "Caged Cat 3 at 16,18"),
        Cat14x19a = (0x08, "cat_14_19_1", "Caged Cat 1 at 14,19"),
        Cat14x19b = (0x10, "cat_14_19_2", "Caged Cat 2 at 14,19"),
        Wheel = (0x20, "wheel", "Caged Wheel"),
    }
}

label_enum! {
    pub enum ManticoreState: "manticore state" {
        Default = (0x0, "default", "Default"),
        Overworld = (0x1, "overworld", "Overworld"),
        Space = (0x2, "space", "In Space"),
    }
}

label_enum! {
    pub enum Progress: "progress flag" {
        HpBar = (0x08, "hp_bar", "Show HP Bar"),
        HouseKey = (0x10, "house_key", "Drop House Key"),
    }
}

label_enum! {
    pub enum BigStalactiteState: "stalactite state" {
        Intact = (0, "intact", "Intact"),
        CrackedOnce = (1, "cracked_once", "Cracked Once"),
        CrackedTwice = (2, "cracked_twice", "Cracked Twice"),
        Floor = (3, "floor", "On the Floor"),
        FloorCrackedOnce = (4, "floor_cracked_once", "On the Floor, Cracked Once"),
        FloorCrackedTwice = (5, "floor_cracked_twice", "On the Floor, Cracked Twice"),
        Broken = (6, "broken", "Broken"),
    }
}

label_enum! {
    pub enum KangarooShardState: "k. shard state" {
        None = (0, "none", "None"),
        Dropped = (1, "dropped", "Dropped"),
        Collected = (2, "collected", "Collected"),
        Inserted = (3, "inserted", "Inserted"),
    }
}

label_enum! {
    /// Where the kangaroo is in its encounter cycle. Lurking is the safe
    /// state to force: it attacks once the player passes a trigger.
    pub enum KangarooActivityState: "kangaroo state" {
        Initial = (0, "initial", "Initial Encounter"),
        Lurking = (1, "lurking", "Lurking"),
        Attacking = (2, "attacking", "Attacking"),
    }
}

label_enum! {
    pub enum ElevatorDirection: "elevator direction" {
        BlueRat = (0x1, "blue_rat", "Blue Rat (0: down, 1: up)"),
        RedRat = (0x2, "red_rat", "Red Rat (0: right, 1: left)"),
        Ostrich = (0x4, "ostrich", "Ostrich (0: right, 1: left)"),
        Dog = (0x8, "dog", "Dog (0: down, 1: up)"),
    }
}

label_enum! {
    /// Elevators 5-7 start disabled; the wheel ostrich platforms join them
    /// once the ostrich is freed.
    pub enum ElevatorDisabled: "disabled elevator" {
        E1 = (0x01, "e1", "Elevator 1"),
        E2 = (0x02, "e2", "Elevator 2"),
        Ostrich = (0x04, "ostrich", "Wheel Ostrich Platforms"),
        E4 = (0x08, "e4", "Elevator 4"),
        E5 = (0x10, "e5", "Elevator 5"),
        E6 = (0x20, "e6", "Elevator 6"),
        E7 = (0x40, "e7", "Elevator 7"),
        E8 = (0x80, "e8", "Elevator 8"),
    }
}
