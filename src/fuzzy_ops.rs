//! # Operadores Fuzzy — T-normas, T-conormas, Negações e Hedges
//!
//! Implementação das quatro famílias de operadores sobre graus de crença
//! em [0,1], todas como **funções puras**.
//!
//! ## Famílias Disponíveis
//!
//! | Família | Operadores | Fórmulas |
//! |---------|-----------|----------|
//! | T-norma (AND) | [`and_min`], [`and_product`], [`and_lukasiewicz`] | `min(a,b)`, `a·b`, `max(0, a+b−1)` |
//! | T-conorma (OR) | [`or_max`], [`or_probabilistic`], [`or_bounded`] | `max(a,b)`, `a+b−a·b`, `min(1, a+b)` |
//! | Negação | [`not_standard`], [`not_sugeno`], [`not_yager`] | `1−a`, `(1−a)/(1+λa)`, `(1−aʷ)^(1/w)` |
//! | Hedge | [`very`], [`somewhat`], [`extremely`], [`hedge`] | `a²`, `a^0.5`, `a³`, `aᵖ` |
//!
//! ## Semântica de Referência do Motor
//!
//! O driver de inferência padrão usa sempre:
//! - **AND** entre condições de uma regra: [`and_min`] sobre os graus casados;
//! - **OR**: [`or_max`];
//! - **Combinação fuzzy-OR** na inserção de fato duplicado: [`or_max`];
//! - **NOT** em condições: negação-por-falha, sem contribuição de grau.
//!
//! Os operadores alternativos ficam disponíveis para chamadores do motor,
//! mas o driver padrão não os emprega.

/// AND fuzzy pelo mínimo (T-norma de Zadeh).
///
/// É a operação de AND padrão do motor: o grau de uma conjunção é o
/// grau do seu elo mais fraco.
pub fn and_min(a: f64, b: f64) -> f64 {
    a.min(b)
}

/// AND fuzzy pelo produto algébrico.
pub fn and_product(a: f64, b: f64) -> f64 {
    a * b
}

/// AND fuzzy pela T-norma de Łukasiewicz: `max(0, a + b − 1)`.
pub fn and_lukasiewicz(a: f64, b: f64) -> f64 {
    (a + b - 1.0).max(0.0)
}

/// OR fuzzy pelo máximo (T-conorma de Zadeh).
///
/// É a operação de OR padrão do motor e também a semântica de
/// **combinação fuzzy-OR**: reinserir um fato já existente substitui o
/// grau armazenado pelo máximo entre o antigo e o novo.
pub fn or_max(a: f64, b: f64) -> f64 {
    a.max(b)
}

/// OR fuzzy pela soma probabilística: `a + b − a·b`.
pub fn or_probabilistic(a: f64, b: f64) -> f64 {
    a + b - a * b
}

/// OR fuzzy pela T-conorma limitada (Łukasiewicz): `min(1, a + b)`.
pub fn or_bounded(a: f64, b: f64) -> f64 {
    (a + b).min(1.0)
}

/// Negação padrão: `1 − a`.
pub fn not_standard(a: f64) -> f64 {
    1.0 - a
}

/// Negação de Sugeno: `(1 − a) / (1 + λ·a)`.
///
/// O parâmetro `lambda` deve ser maior que −1; com `lambda = 0` a
/// negação coincide com [`not_standard`].
pub fn not_sugeno(a: f64, lambda: f64) -> f64 {
    debug_assert!(lambda > -1.0, "negação de Sugeno exige λ > −1");
    (1.0 - a) / (1.0 + lambda * a)
}

/// Negação de Yager: `(1 − aʷ)^(1/w)`.
///
/// O parâmetro `w` deve ser positivo; com `w = 1` a negação coincide
/// com [`not_standard`].
pub fn not_yager(a: f64, w: f64) -> f64 {
    debug_assert!(w > 0.0, "negação de Yager exige w > 0");
    (1.0 - a.powf(w)).powf(1.0 / w)
}

/// Hedge de potência genérico: `aᵖ`.
///
/// Expoentes maiores que 1 concentram o grau (intensificação);
/// expoentes entre 0 e 1 o dilatam (atenuação).
pub fn hedge(a: f64, p: f64) -> f64 {
    a.powf(p)
}

/// Hedge "very" — intensificação quadrática: `a²`.
pub fn very(a: f64) -> f64 {
    hedge(a, 2.0)
}

/// Hedge "somewhat" — dilatação pela raiz quadrada: `a^0.5`.
pub fn somewhat(a: f64) -> f64 {
    hedge(a, 0.5)
}

/// Hedge "extremely" — intensificação cúbica: `a³`.
pub fn extremely(a: f64) -> f64 {
    hedge(a, 3.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// As três T-normas coincidem nos extremos booleanos.
    #[test]
    fn test_t_norms_boolean_corners() {
        for and in [and_min, and_product, and_lukasiewicz] {
            assert!((and(1.0, 1.0) - 1.0).abs() < 1e-12);
            assert!(and(0.0, 1.0).abs() < 1e-12);
            assert!(and(0.0, 0.0).abs() < 1e-12);
        }
    }

    /// Ordenação clássica entre as T-normas: Łukasiewicz ≤ produto ≤ mínimo.
    #[test]
    fn test_t_norm_ordering() {
        let (a, b) = (0.7, 0.6);
        assert!(and_lukasiewicz(a, b) <= and_product(a, b));
        assert!(and_product(a, b) <= and_min(a, b));
    }

    /// Ordenação dual entre as T-conormas: máximo ≤ probabilística ≤ limitada.
    #[test]
    fn test_t_conorm_ordering() {
        let (a, b) = (0.7, 0.6);
        assert!(or_max(a, b) <= or_probabilistic(a, b));
        assert!(or_probabilistic(a, b) <= or_bounded(a, b));
    }

    /// A negação de Sugeno com λ = 0 degenera na negação padrão.
    #[test]
    fn test_sugeno_degenerates_to_standard() {
        for a in [0.0, 0.3, 0.8, 1.0] {
            assert!((not_sugeno(a, 0.0) - not_standard(a)).abs() < 1e-12);
        }
    }

    /// A negação de Yager com w = 1 degenera na negação padrão.
    #[test]
    fn test_yager_degenerates_to_standard() {
        for a in [0.0, 0.3, 0.8, 1.0] {
            assert!((not_yager(a, 1.0) - not_standard(a)).abs() < 1e-12);
        }
    }

    /// "very" concentra e "somewhat" dilata graus intermediários.
    #[test]
    fn test_hedges() {
        assert!(very(0.8) < 0.8);
        assert!(somewhat(0.8) > 0.8);
        assert!(extremely(0.8) < very(0.8));
        // Os pontos fixos 0 e 1 são preservados por qualquer hedge de potência
        assert!((very(1.0) - 1.0).abs() < 1e-12);
        assert!(somewhat(0.0).abs() < 1e-12);
    }
}
