use hack::io::{KBD, SCREEN_BASE, SCREEN_WORDS};
use hack::machine::{dump_ram_file, load_ram_file};
use hack::{assemble, disassemble, Key, Machine, Screen, SnapshotPolicy};

fn machine(source: &str) -> Machine {
    Machine::with_program(&assemble(source).unwrap()).unwrap()
}

#[test]
fn adds_two_numbers() {
    let mut m = machine("@5\nD=A\n@3\nD=D+A\n@0\nM=D");
    m.run(3);
    assert_eq!(m.d(), 5);
    m.run(6);
    assert_eq!(m.d(), 8);
    assert_eq!(m.mmio_get(0), 8);
}

#[test]
fn sums_one_to_ten() {
    let source = r#"
        @i
        M=1
        @sum
        M=0
    (LOOP)
        @i
        D=M
        @10
        D=D-A
        @END
        D;JGT
        @i
        D=M
        @sum
        M=M+D
        @i
        M=M+1
        @LOOP
        0;JMP
    (END)
        @END
        0;JMP
    "#;
    let mut m = machine(source);
    m.run(500);
    assert_eq!(m.mmio_get(17), 55);
    assert_eq!(m.mmio_get(16), 11);
}

#[test]
fn fills_screen_while_key_held() {
    // Blacken the whole screen when a key is down
    let source = r#"
    (WAIT)
        @KBD
        D=M
        @WAIT
        D;JEQ
        @SCREEN
        D=A
        @p
        M=D
    (FILL)
        @p
        A=M
        M=-1
        @p
        MD=M+1
        @24576
        D=D-A
        @FILL
        D;JLT
    (DONE)
        @DONE
        0;JMP
    "#;
    let mut m = machine(source);
    m.run(100);
    assert_eq!(m.mmio_get(SCREEN_BASE), 0);

    m.press_key(Key::Char('x'));
    assert_eq!(m.mmio_get(KBD), 'X' as u16);
    m.run(8192 * 10 + 100);

    let mut screen = Screen::new();
    screen.sync(&m);
    assert!(screen.pixel(0, 0));
    assert!(screen.pixel(511, 255));
    assert_eq!(m.mmio_get(SCREEN_BASE + SCREEN_WORDS - 1), 0xFFFF);
    assert_eq!(m.mmio_get(KBD), 'X' as u16);
}

#[test]
fn ram_snapshot_survives_a_round_trip() {
    let path = std::env::temp_dir().join(format!("hack-programs-{}.dump", std::process::id()));

    let mut m = machine("@1234\nD=A\n@100\nM=D");
    m.run(4);
    dump_ram_file(&m, &path).unwrap();
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 65536);

    let mut fresh = Machine::new();
    assert_eq!(load_ram_file(&mut fresh, &path, SnapshotPolicy::Reject).unwrap(), 65536);
    assert_eq!(fresh.mmio_get(100), 1234);
    assert_eq!(fresh.ram_bytes(), m.ram_bytes());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn listing_names_every_instruction() {
    let program = assemble("@2\nD=A\n@3\nD=D+A\n@0\nM=D;JMP").unwrap();
    let listing = disassemble(&program);
    for text in ["@2", "D=A", "D=D+A", "M=D;JMP"] {
        assert!(listing.contains(text), "missing {} in\n{}", text, listing);
    }
}

#[test]
fn screen_sees_writes_through_high_addresses() {
    // 0xC000 aliases SCREEN_BASE once masked to 15 bits
    let mut m = machine("@16384\nD=A\nD=D+A\nD=D+A\nA=D\nM=-1");
    m.reset();
    let mut screen = Screen::new();
    screen.take_dirty();

    let mut wrote = None;
    for _ in 0..6 {
        let out = m.step();
        if screen.observe(&out) {
            wrote = Some(out.address);
        }
    }

    assert_eq!(wrote, Some(0xC000));
    assert_eq!(m.mmio_get(SCREEN_BASE), 0xFFFF);
    assert!(screen.take_dirty());
    assert!(screen.pixel(0, 0));
    assert!(screen.pixel(15, 0));
}
