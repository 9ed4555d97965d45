use crate::diag::Diagnostic;
use crate::nameck::Nameset;
use crate::parser_tests::{assert_verifies, verify_text};
use crate::util::HashMap;
use crate::verify::{proof_numbers, substitute};
use assert_matches::assert_matches;

/// Declarations in the style of the Metamath book's demo database: terms
/// over 0 and +, equality, implication, and modus ponens.  Appending a `$p`
/// statement yields a small but complete database.
const DEMO: &[u8] = b"
    $c 0 + = -> ( ) term wff |- $.
    $v t r s P Q $.
    tt $f term t $.
    tr $f term r $.
    ts $f term s $.
    wp $f wff P $.
    wq $f wff Q $.
    tze $a term 0 $.
    tpl $a term ( t + r ) $.
    weq $a wff t = r $.
    wim $a wff ( P -> Q ) $.
    a1 $a |- ( t = r -> ( t = s -> r = s ) ) $.
    a2 $a |- ( t + 0 ) = t $.
    ${
        min $e |- P $.
        maj $e |- ( P -> Q ) $.
        mp $a |- Q $.
    $}
";

fn demo(theorem: &[u8]) -> Vec<u8> {
    let mut db = DEMO.to_vec();
    db.extend_from_slice(theorem);
    db
}

const TH1_NORMAL: &[u8] = b"th1 $p |- t = t $=
    tt tze tpl tt weq tt tt weq tt a2 tt tze tpl tt weq tt tze tpl tt weq
    tt tt weq wim tt a2 tt tze tpl tt tt a1 mp mp $.";

const TH1_COMPRESSED: &[u8] =
    b"th1 $p |- t = t $= ( tze tpl weq a2 wim a1 mp ) ABCZADZAADZAEZJJKFLIAAGHH $.";

#[test]
fn demo_theorem_normal_proof() {
    assert_verifies(&demo(TH1_NORMAL));
}

#[test]
fn demo_theorem_compressed_proof() {
    assert_verifies(&demo(TH1_COMPRESSED));
}

#[test]
fn both_formats_agree_on_a_broken_theorem() {
    // same wrong statement, both encodings: the machine ends with
    // |- t = t, not |- ( t + 0 ) = t
    let (normal, _) = verify_text(&demo(
        b"bad $p |- ( t + 0 ) = t $=
            tt tze tpl tt weq tt tt weq tt a2 tt tze tpl tt weq tt tze tpl tt weq
            tt tt weq wim tt a2 tt tze tpl tt tt a1 mp mp $.",
    ));
    let (compressed, _) = verify_text(&demo(
        b"bad $p |- ( t + 0 ) = t $= ( tze tpl weq a2 wim a1 mp ) ABCZADZAADZAEZJJKFLIAAGHH $.",
    ));
    assert_matches!(normal, Err(Diagnostic::ProofWrongExprEnd(_)));
    assert_matches!(compressed, Err(Diagnostic::ProofWrongExprEnd(_)));
}

#[test]
fn proof_refers_to_itself() {
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= bad $."));
    assert_matches!(result, Err(Diagnostic::ProofSelfReference(_)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( bad ) A $."));
    assert_matches!(result, Err(Diagnostic::ProofSelfReference(_)));
}

#[test]
fn proof_step_must_be_active() {
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= nosuch $."));
    assert_matches!(result, Err(Diagnostic::StepMissing(_, _)));
    // min and maj deactivated when their block closed
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= min $."));
    assert_matches!(result, Err(Diagnostic::StepMissing(_, _)));
}

#[test]
fn empty_proofs() {
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= $."));
    assert_matches!(result, Err(Diagnostic::MissingProof(_)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( ) $."));
    assert_matches!(result, Err(Diagnostic::MissingProof(_)));
}

#[test]
fn incomplete_proofs_warn_and_continue() {
    let (result, warnings) = verify_text(&demo(b"sk $p |- t = t $= ? $. next $a wff P $."));
    assert_matches!(result, Ok(()));
    assert_matches!(warnings.as_slice(), [Diagnostic::ProofIncomplete(_)]);

    let (result, warnings) = verify_text(&demo(b"sk $p |- t = t $= tt ? a2 $."));
    assert_matches!(result, Ok(()));
    assert_matches!(warnings.as_slice(), [Diagnostic::ProofIncomplete(_)]);

    let (result, warnings) = verify_text(&demo(b"sk $p |- t = t $= ( a2 ) A? $."));
    assert_matches!(result, Ok(()));
    assert_matches!(warnings.as_slice(), [Diagnostic::ProofIncomplete(_)]);
}

#[test]
fn stack_underflow() {
    let (result, _) = verify_text(&demo(b"bad $p |- ( t + 0 ) = t $= a2 $."));
    assert_matches!(result, Err(Diagnostic::ProofUnderflow(_)));
}

#[test]
fn stack_must_end_with_one_item() {
    let (result, _) = verify_text(&demo(b"bad $p |- ( t + 0 ) = t $= tt tt a2 $."));
    assert_matches!(result, Err(Diagnostic::ProofExcessEnd(_)));
}

#[test]
fn unification_failures() {
    // a2 needs a term on the stack, wp pushes a wff
    let (result, _) = verify_text(&demo(b"bad $p |- ( P + 0 ) = P $= wp a2 $."));
    assert_matches!(result, Err(Diagnostic::StepFloatWrongType(_)));
    // mp's min hypothesis does not match the statement on the stack
    let (result, _) = verify_text(&demo(
        b"bad $p |- t = t $= tt tze tpl tt weq tt tt weq tt tze tpl tt tt a1 tt a2 mp $.",
    ));
    assert_matches!(result, Err(Diagnostic::StepEssenWrong(_)));
}

#[test]
fn assertions_survive_scope_exit() {
    // mp was declared inside a block; its frame captured min and maj and
    // stays usable afterwards (exercised by the demo proofs), and a block's
    // own assertion is referenceable with its essential hypothesis supplied
    // on the stack
    assert_verifies(
        b"$c wff $. $v x $. wx $f wff x $.
          ${ hx $e wff x $. ax $a wff x $. $}
          th $p wff x $= wx wx ax $.",
    );
}

#[test]
fn hypotheses_deactivate_at_scope_exit() {
    let (result, _) = verify_text(
        b"$c wff $. $v x $. wx $f wff x $.
          ${ hx $e wff x $. ax $a wff x $. $}
          th $p wff x $= hx ax $.",
    );
    assert_matches!(result, Err(Diagnostic::StepMissing(_, _)));
}

#[test]
fn disjoint_variable_violation() {
    // ax carries the restriction x # y; substituting x for both violates it
    let (result, _) = verify_text(
        b"$c |- wff $. $v x y $. wx $f wff x $. wy $f wff y $.
          ${ $d x y $. ax $a |- x y $. $}
          bad $p |- x x $= wx wx ax $.",
    );
    assert_matches!(result, Err(Diagnostic::ProofDvViolation(_)));
}

#[test]
fn disjoint_variable_satisfied() {
    // the proof site provides an active $d for the substituted variables
    assert_verifies(
        b"$c |- wff $. $v x y $. wx $f wff x $. wy $f wff y $.
          ${ $d x y $. ax $a |- x y $. $}
          $d x y $.
          ok $p |- x y $= wx wy ax $.",
    );
}

#[test]
fn disjoint_check_applies_to_substituted_variables() {
    // x -> y, y -> x is fine exactly when y # x holds at the proof site
    let ok = b"$c |- wff $. $v x y $. wx $f wff x $. wy $f wff y $.
          ${ $d x y $. ax $a |- x y $. $}
          $d y x $.
          th $p |- y x $= wy wx ax $.";
    assert_verifies(ok);
    let (result, _) = verify_text(
        b"$c |- wff $. $v x y $. wx $f wff x $. wy $f wff y $.
          ${ $d x y $. ax $a |- x y $. $}
          th $p |- y x $= wy wx ax $.",
    );
    assert_matches!(result, Err(Diagnostic::ProofDvViolation(_)));
}

#[test]
fn compressed_roster_checks() {
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( tt ) AB $."));
    assert_matches!(result, Err(Diagnostic::MandatoryHypInRoster(_, _)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( nosuch ) AB $."));
    assert_matches!(result, Err(Diagnostic::StepMissing(_, _)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( min ) AB $."));
    assert_matches!(result, Err(Diagnostic::StepMissing(_, _)));
}

#[test]
fn compressed_text_checks() {
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( a2 ) Ab $."));
    assert_matches!(result, Err(Diagnostic::ProofBadCharacter(_)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( a2 ) ZA $."));
    assert_matches!(result, Err(Diagnostic::ProofInvalidSave(_)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( a2 ) AU $."));
    assert_matches!(result, Err(Diagnostic::ProofMalformedNumber(_)));
    let (result, _) = verify_text(&demo(b"bad $p |- t = t $= ( ) C $."));
    assert_matches!(result, Err(Diagnostic::StepOutOfRange(_)));
}

#[test]
fn minimal_compressed_proof() {
    // index 1 is the single mandatory hypothesis
    assert_verifies(b"$c wff $. $v x $. wx $f wff x $. th $p wff x $= ( ) A $.");
}

#[test]
fn compressed_decoding() {
    assert_eq!(proof_numbers(b"th", b"ABZUA").unwrap(), vec![1, 2, 0, 21]);
    assert_eq!(proof_numbers(b"th", b"T").unwrap(), vec![20]);
    assert_eq!(proof_numbers(b"th", b"UA").unwrap(), vec![21]);
    assert_eq!(proof_numbers(b"th", b"YT").unwrap(), vec![120]);
    assert_eq!(proof_numbers(b"th", b"UUA").unwrap(), vec![121]);
    assert_eq!(proof_numbers(b"th", b"ABZ").unwrap(), vec![1, 2, 0]);
}

#[test]
fn compressed_decoding_errors() {
    assert_matches!(
        proof_numbers(b"th", b"Z"),
        Err(Diagnostic::ProofInvalidSave(_))
    );
    assert_matches!(
        proof_numbers(b"th", b"AZZ"),
        Err(Diagnostic::ProofInvalidSave(_))
    );
    assert_matches!(
        proof_numbers(b"th", b"UZ"),
        Err(Diagnostic::ProofInvalidSave(_))
    );
    assert_matches!(
        proof_numbers(b"th", b"AU"),
        Err(Diagnostic::ProofMalformedNumber(_))
    );
    let overflow = vec![b'Y'; 40];
    assert_matches!(
        proof_numbers(b"th", &overflow),
        Err(Diagnostic::ProofNumberOverflow(_))
    );
}

#[test]
fn substitution_laws() {
    let mut names = Nameset::default();
    let k = names.intern(b"k");
    let x = names.intern(b"x");
    let y = names.intern(b"y");
    let a = names.intern(b"a");
    let b = names.intern(b"b");
    let c = names.intern(b"c");

    let expr = vec![k, x, y];

    // the empty substitution is the identity
    let empty = HashMap::default();
    assert_eq!(substitute(&expr, &empty), expr);

    // composition: applying sigma then tau equals applying their composite,
    // when tau only touches variables outside sigma's range
    let mut sigma = HashMap::default();
    sigma.insert(x, vec![a, b]);
    let mut tau = HashMap::default();
    tau.insert(y, vec![c]);

    let staged = substitute(&substitute(&expr, &sigma), &tau);
    let mut composite = sigma.clone();
    composite.insert(y, vec![c]);
    assert_eq!(staged, substitute(&expr, &composite));
    assert_eq!(staged, vec![k, a, b, c]);
}

#[test]
fn saved_steps_recall_expressions() {
    // Z saves the top of the stack; with one mandatory hypothesis and one
    // roster label, the first recall index is 3 (letter C)
    assert_verifies(
        b"$c wff -> ( ) $. $v x y $.
          wx $f wff x $. wy $f wff y $.
          wim $a wff ( x -> y ) $.
          th $p wff ( ( x -> x ) -> ( x -> x ) ) $= ( wim ) AABZCB $.",
    );
}
