use crate::error::Result;
use crate::hardware::Hardware;
use crate::opcode::Opcode;
use crate::operations::*;
use crate::quirks::Quirks;
use crate::state::{State, Step};

/// Executes one decoded instruction against the state
pub type Operation = fn(
    op: &dyn Opcode,
    state: &mut State,
    hardware: &mut dyn Hardware,
    quirks: &Quirks,
) -> Result<Step>;

/// Selects the correct Instruction for a given Opcode, if there is one
pub fn from_op(op: &dyn Opcode) -> Option<Operation> {
    let operation: Operation = match op.nibbles() {
        (0x0, 0x0, 0xE, 0x0) => clr,
        (0x0, 0x0, 0xE, 0xE) => rts,
        (0x1, ..) => jump,
        (0x2, ..) => call,
        (0x3, ..) => ske,
        (0x4, ..) => skne,
        (0x5, .., 0x0) => skre,
        (0x6, ..) => load,
        (0x7, ..) => add,
        (0x8, .., 0x0) => mv,
        (0x8, .., 0x1) => or,
        (0x8, .., 0x2) => and,
        (0x8, .., 0x3) => xor,
        (0x8, .., 0x4) => addr,
        (0x8, .., 0x5) => sub,
        (0x8, .., 0x6) => shr,
        (0x8, .., 0x7) => subn,
        (0x8, .., 0xE) => shl,
        (0x9, .., 0x0) => skrne,
        (0xA, ..) => loadi,
        (0xB, ..) => jumpi,
        (0xC, ..) => rand,
        (0xD, ..) => draw,
        (0xE, _, 0x9, 0xE) => skpr,
        (0xE, _, 0xA, 0x1) => skup,
        (0xF, _, 0x0, 0x7) => moved,
        (0xF, _, 0x0, 0xA) => keyd,
        (0xF, _, 0x1, 0x5) => loads,
        (0xF, _, 0x1, 0x8) => ld,
        (0xF, _, 0x1, 0xE) => addi,
        (0xF, _, 0x2, 0x9) => ldspr,
        (0xF, _, 0x3, 0x3) => bcd,
        (0xF, _, 0x5, 0x5) => stor,
        (0xF, _, 0x6, 0x5) => read,
        _ => return None,
    };
    Some(operation)
}

#[cfg(test)]
mod test_instruction {
    use super::*;
    use crate::error::Error;
    use crate::mock::MockHardware;

    fn execute_with(
        op: u16,
        state: &mut State,
        hardware: &mut MockHardware,
        quirks: Quirks,
    ) -> Step {
        let operation = from_op(&op).expect("opcode should be recognized");
        operation(&op, state, hardware, &quirks).expect("operation should succeed")
    }

    fn try_execute(op: u16, state: &mut State) -> Result<Step> {
        let operation = from_op(&op).expect("opcode should be recognized");
        operation(&op, state, &mut MockHardware::default(), &Quirks::default())
    }

    fn execute(op: u16, state: &mut State) -> Step {
        execute_with(op, state, &mut MockHardware::default(), Quirks::default())
    }

    #[test]
    fn test_00e0_cls() {
        let mut state = State::new();
        let mut hardware = MockHardware::default();
        execute_with(0x00E0, &mut state, &mut hardware, Quirks::default());
        assert_eq!(hardware.clears, 1);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_00ee_ret() {
        let mut state = State::new();
        state.sp = 0x1;
        state.stack[0x0] = 0x0ABC;
        execute(0x00EE, &mut state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_00ee_ret_underflows() {
        let mut state = State::new();
        let result = try_execute(0x00EE, &mut state);
        assert!(matches!(result, Err(Error::StackUnderflow { pc: 0x0200 })));
    }

    #[test]
    fn test_1nnn_jp() {
        let mut state = State::new();
        execute(0x1ABC, &mut state);
        assert_eq!(state.pc, 0x0ABC);
    }

    #[test]
    fn test_2nnn_call() {
        let mut state = State::new();
        state.pc = 0x0ABC;
        execute(0x2123, &mut state);
        assert_eq!(state.sp, 0x1);
        assert_eq!(state.stack[0x0], 0x0ABE);
        assert_eq!(state.pc, 0x0123);
    }

    #[test]
    fn test_2nnn_call_then_ret() {
        let mut state = State::new();
        execute(0x2300, &mut state);
        execute(0x00EE, &mut state);
        assert_eq!(state.sp, 0x0);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_2nnn_call_overflows() {
        let mut state = State::new();
        for _ in 0..16 {
            execute(0x2200, &mut state);
        }
        let result = try_execute(0x2200, &mut state);
        assert!(matches!(result, Err(Error::StackOverflow { pc: 0x0200 })));
        assert_eq!(state.sp, 0x10);
    }

    #[test]
    fn test_3xkk_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        execute(0x3111, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_3xkk_se_doesntskip() {
        let mut state = State::new();
        execute(0x3111, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_4xkk_sne_skips() {
        let mut state = State::new();
        execute(0x4111, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_4xkk_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        execute(0x4111, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xy0_se_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        execute(0x5120, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_5xy0_se_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        execute(0x5120, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_5xyn_unrecognized() {
        assert!(from_op(&0x5001u16).is_none());
    }

    #[test]
    fn test_6xkk_ld() {
        let mut state = State::new();
        execute(0x6122, &mut state);
        assert_eq!(state.v[0x1], 0x22);
    }

    #[test]
    fn test_7xkk_add() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        execute(0x7122, &mut state);
        assert_eq!(state.v[0x1], 0x23);
    }

    #[test]
    fn test_7xkk_add_wraps_without_flag() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        execute(0x7102, &mut state);
        assert_eq!(state.v[0x1], 0x01);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy0_ld() {
        let mut state = State::new();
        state.v[0x2] = 0x1;
        execute(0x8120, &mut state);
        assert_eq!(state.v[0x1], 0x1);
    }

    #[test]
    fn test_8xy1_or() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x1;
        execute(0x8121, &mut state);
        assert_eq!(state.v[0x1], 0x7);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy2_and() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x1;
        execute(0x8122, &mut state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy3_xor() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x1;
        execute(0x8123, &mut state);
        assert_eq!(state.v[0x1], 0x5);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy3_xor_keeps_flag_without_reset_quirk() {
        let mut state = State::new();
        state.v[0x1] = 0x6;
        state.v[0x2] = 0x3;
        state.v[0xF] = 0x1;
        let quirks = Quirks {
            logic_flag_reset: false,
            ..Quirks::default()
        };
        execute_with(0x8123, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.v[0x1], 0x5);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy4_add_nocarry() {
        let mut state = State::new();
        state.v[0x1] = 0xEE;
        state.v[0x2] = 0x11;
        execute(0x8124, &mut state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy4_add_carry() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        state.v[0x2] = 0x11;
        execute(0x8124, &mut state);
        assert_eq!(state.v[0x1], 0x10);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8fy4_add_flag_wins() {
        let mut state = State::new();
        state.v[0xF] = 0xFF;
        state.v[0x2] = 0x11;
        execute(0x8F24, &mut state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x33;
        state.v[0x2] = 0x11;
        execute(0x8125, &mut state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy5_sub_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x10;
        state.v[0x2] = 0x20;
        execute(0x8125, &mut state);
        assert_eq!(state.v[0x1], 0xF0);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy5_sub_equal_is_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x20;
        state.v[0x2] = 0x20;
        execute(0x8125, &mut state);
        assert_eq!(state.v[0x1], 0x0);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_lsb() {
        let mut state = State::new();
        state.v[0x1] = 0b0000_0011;
        execute(0x8106, &mut state);
        assert_eq!(state.v[0x1], 0b0000_0001);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy6_shr_nolsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        execute(0x8106, &mut state);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_from_vy_without_shift_quirk() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        state.v[0x2] = 0x9;
        let quirks = Quirks {
            shift: false,
            ..Quirks::default()
        };
        execute_with(0x8126, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.v[0x1], 0x4);
        assert_eq!(state.v[0x2], 0x9);
        // flag comes from Vx, not the shifted Vy
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xy6_shr_flag_from_vx_without_shift_quirk() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        state.v[0x2] = 0x4;
        let quirks = Quirks {
            shift: false,
            ..Quirks::default()
        };
        execute_with(0x8126, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8fy6_shr_leaves_flag_in_vf() {
        let mut state = State::new();
        state.v[0xF] = 0x3;
        execute(0x8F06, &mut state);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_noborrow() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x33;
        execute(0x8127, &mut state);
        assert_eq!(state.v[0x1], 0x22);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xy7_subn_borrow() {
        let mut state = State::new();
        state.v[0x1] = 0x12;
        state.v[0x2] = 0x11;
        execute(0x8127, &mut state);
        assert_eq!(state.v[0x1], 0xFF);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_msb() {
        let mut state = State::new();
        state.v[0x1] = 0xFF;
        execute(0x810E, &mut state);
        // 0xFF * 2 = 0x01FE
        assert_eq!(state.v[0x1], 0xFE);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_8xye_shl_nomsb() {
        let mut state = State::new();
        state.v[0x1] = 0x4;
        execute(0x810E, &mut state);
        assert_eq!(state.v[0x1], 0x8);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_from_vy_without_shift_quirk() {
        let mut state = State::new();
        state.v[0x1] = 0x1;
        state.v[0x2] = 0x81;
        let quirks = Quirks {
            shift: false,
            ..Quirks::default()
        };
        execute_with(0x812E, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.v[0x1], 0x02);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_8xye_shl_flag_from_vx_without_shift_quirk() {
        let mut state = State::new();
        state.v[0x1] = 0x80;
        state.v[0x2] = 0x1;
        let quirks = Quirks {
            shift: false,
            ..Quirks::default()
        };
        execute_with(0x812E, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.v[0x1], 0x2);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_9xy0_sne_skips() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        execute(0x9120, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_9xy0_sne_doesntskip() {
        let mut state = State::new();
        state.v[0x1] = 0x11;
        state.v[0x2] = 0x11;
        execute(0x9120, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_annn_ld() {
        let mut state = State::new();
        execute(0xAABC, &mut state);
        assert_eq!(state.i, 0xABC);
    }

    #[test]
    fn test_bnnn_jp() {
        let mut state = State::new();
        state.v[0x0] = 0x2;
        execute(0xBABC, &mut state);
        assert_eq!(state.pc, 0xABE);
    }

    #[test]
    fn test_cxkk_rnd() {
        let mut state = State::new();
        let mut hardware = MockHardware {
            random: 0xAB,
            ..MockHardware::default()
        };
        execute_with(0xC10F, &mut state, &mut hardware, Quirks::default());
        assert_eq!(state.v[0x1], 0x0B);
    }

    #[test]
    fn test_dxyn_drw_draws() {
        let mut state = State::new();
        state.v[0x0] = 0x1;
        state.v[0x1] = 0x2;
        state.i = 0x5;
        let mut hardware = MockHardware::default();
        // Draw the 0x1 glyph at 1x 2y
        execute_with(0xD015, &mut state, &mut hardware, Quirks::default());
        assert_eq!(
            hardware.sprites,
            vec![(vec![0x20, 0x60, 0x20, 0x20, 0x70], 0x1, 0x2, true)]
        );
        assert_eq!(state.v[0xF], 0x0);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_dxyn_drw_passes_wrap_quirk() {
        let mut state = State::new();
        let mut hardware = MockHardware::default();
        let quirks = Quirks {
            wrap: false,
            ..Quirks::default()
        };
        execute_with(0xD001, &mut state, &mut hardware, quirks);
        assert!(!hardware.sprites[0].3);
    }

    #[test]
    fn test_dxyn_drw_collides() {
        let mut state = State::new();
        let mut hardware = MockHardware {
            collide: true,
            ..MockHardware::default()
        };
        execute_with(0xD001, &mut state, &mut hardware, Quirks::default());
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_dxyn_drw_out_of_memory() {
        let mut state = State::new();
        state.i = 0xFFE;
        let result = try_execute(0xD003, &mut state);
        assert!(matches!(
            result,
            Err(Error::MemoryOutOfRange { address: 0xFFE, len: 3 })
        ));
    }

    #[test]
    fn test_ex9e_skp_skips() {
        let mut state = State::new();
        state.key_states[0xE] = true;
        state.v[0x1] = 0xE;
        execute(0xE19E, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_ex9e_skp_doesntskip() {
        let mut state = State::new();
        execute(0xE19E, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_exa1_sknp_skips() {
        let mut state = State::new();
        execute(0xE1A1, &mut state);
        assert_eq!(state.pc, 0x0204);
    }

    #[test]
    fn test_exa1_sknp_doesntskip() {
        let mut state = State::new();
        state.key_states[0xE] = true;
        state.v[0x1] = 0xE;
        execute(0xE1A1, &mut state);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx07_ld() {
        let mut state = State::new();
        state.delay_timer = 0xF;
        execute(0xF107, &mut state);
        assert_eq!(state.v[0x1], 0xF);
    }

    #[test]
    fn test_fx0a_ld_waits_for_key() {
        let mut state = State::new();
        assert_eq!(execute(0xF10A, &mut state), Step::AwaitingKey);
        assert_eq!(state.pc, 0x0200);
    }

    #[test]
    fn test_fx0a_ld_takes_last_key() {
        let mut state = State::new();
        state.last_key = Some(0xC);
        assert_eq!(execute(0xF10A, &mut state), Step::Advanced);
        assert_eq!(state.v[0x1], 0xC);
        assert_eq!(state.pc, 0x0202);
    }

    #[test]
    fn test_fx15_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        execute(0xF115, &mut state);
        assert_eq!(state.delay_timer, 0xF);
    }

    #[test]
    fn test_fx18_ld() {
        let mut state = State::new();
        state.v[0x1] = 0xF;
        execute(0xF118, &mut state);
        assert_eq!(state.sound_timer, 0xF);
    }

    #[test]
    fn test_fx1e_add() {
        let mut state = State::new();
        state.i = 0x1;
        state.v[0x1] = 0x1;
        execute(0xF11E, &mut state);
        assert_eq!(state.i, 0x2);
        assert_eq!(state.v[0xF], 0x0);
    }

    #[test]
    fn test_fx1e_add_past_memory() {
        let mut state = State::new();
        state.i = 0xFFF;
        state.v[0x1] = 0x1;
        execute(0xF11E, &mut state);
        assert_eq!(state.i, 0x1000);
        assert_eq!(state.v[0xF], 0x1);
    }

    #[test]
    fn test_fx29_ld() {
        let mut state = State::new();
        state.v[0x1] = 0x2;
        execute(0xF129, &mut state);
        assert_eq!(state.i, 0xA);
    }

    #[test]
    fn test_fx33_ld() {
        let mut state = State::new();
        // 0x7B -> 123
        state.v[0x1] = 0x7B;
        state.i = 0x300;
        execute(0xF133, &mut state);
        assert_eq!(state.memory[0x300..0x303], [0x1, 0x2, 0x3]);
    }

    #[test]
    fn test_fx_55_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.v[0x0..0x5].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5]);
        execute(0xF455, &mut state);
        assert_eq!(state.memory[0x300..0x306], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx_55_ld_advances_i_without_load_store_quirk() {
        let mut state = State::new();
        state.i = 0x300;
        let quirks = Quirks {
            load_store: false,
            ..Quirks::default()
        };
        execute_with(0xF355, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.i, 0x304);
    }

    #[test]
    fn test_fx_65_ld() {
        let mut state = State::new();
        state.i = 0x300;
        state.memory[0x300..0x306].copy_from_slice(&[0x1, 0x2, 0x3, 0x4, 0x5, 0x6]);
        execute(0xF465, &mut state);
        assert_eq!(state.v[0x0..0x6], [0x1, 0x2, 0x3, 0x4, 0x5, 0x0]);
        assert_eq!(state.i, 0x300);
    }

    #[test]
    fn test_fx_65_ld_advances_i_without_load_store_quirk() {
        let mut state = State::new();
        state.i = 0x300;
        let quirks = Quirks {
            load_store: false,
            ..Quirks::default()
        };
        execute_with(0xF065, &mut state, &mut MockHardware::default(), quirks);
        assert_eq!(state.i, 0x301);
    }
}
