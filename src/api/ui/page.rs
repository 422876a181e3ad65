//! HTML for the prediction page

use crate::domain::RenderedResult;

pub const INVALID_SMILES_NOTICE: &str = "Ops! It seems you have an invalid SMILES";

pub const SUGGESTIONS: [&str; 3] = [
    "O=CC(=O)C(=O)N=C1C(C(=O)C=O)=CN=C1Br",
    "N=c1sc2c(C(=O)C(=O)C=O)nc(=O)c=2c1=O",
    "BrC1=C2C(=O)N=Cc3c2n2C(O1)NC(=N)c2c3",
];

const FURTHER_READING: [(&str, &str); 3] = [
    (
        "<strong>My Thesis:</strong> Organic Electrode Battery Materials: A Journey from Quantum Mechanics to Artificial Intelligence",
        "https://www.diva-portal.org/smash/record.jsf?pid=diva2%3A1687486&amp;dswid=9698",
    ),
    (
        "<strong>Paper:</strong> Artificial intelligence driven in-silico discovery of novel organic lithium-ion battery cathodes",
        "http://dx.doi.org/10.1016/j.ensm.2021.10.029",
    ),
    (
        "<strong>Paper:</strong> An evolutionary-driven AI model discovering redox-stable organic electrode materials for alkali-ion batteries",
        "http://dx.doi.org/10.1016/j.ensm.2023.102865",
    ),
];

const SMILES_LINKS: [(&str, &str); 3] = [
    (
        "More about SMILES (Wikipedia)",
        "https://en.wikipedia.org/wiki/Simplified_Molecular_Input_Line_Entry_System",
    ),
    (
        "SMILES generator and checker",
        "https://www.cheminfo.org/flavor/malaria/Utilities/SMILES_generator___checker/index.html",
    ),
    (
        "SMILES sketcher from PubChem",
        "https://pubchem.ncbi.nlm.nih.gov//edit3/index.html",
    ),
];

/// What the result block shows below the form
#[derive(Debug, Clone)]
pub enum ResultBlock {
    Rendered(RenderedResult),
    Invalid,
}

/// Escape text for HTML element content and attribute values
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn render_result(block: &ResultBlock) -> String {
    match block {
        ResultBlock::Invalid => format!(
            r#"<div class="alert alert-danger" role="alert">{}</div>"#,
            INVALID_SMILES_NOTICE
        ),
        ResultBlock::Rendered(result) => {
            let readings = result
                .readings()
                .iter()
                .map(|r| {
                    format!(
                        r#"<p class="reading"><strong>{}:</strong> <span style="color: {};">{} {}</span></p>"#,
                        r.label, r.color, r.value, r.unit
                    )
                })
                .collect::<String>();

            format!(
                r#"
            <div class="result-section">
                <div class="row align-items-center">
                    <div class="col-md-6 depiction">{}</div>
                    <div class="col-md-6">
                        <h5 class="text-break">{}</h5>
                        {}
                    </div>
                </div>
            </div>
            "#,
                result.depiction_svg,
                escape_html(&result.molecule),
                readings
            )
        }
    }
}

/// Full page with the form pre-filled and the given result block
pub fn render_page(input: &str, block: &ResultBlock, max_smiles_length: usize) -> String {
    let suggestions = SUGGESTIONS
        .iter()
        .map(|s| format!("<li><code>{}</code></li>", escape_html(s)))
        .collect::<String>();

    let further_reading = FURTHER_READING
        .iter()
        .map(|(label, url)| {
            format!(
                r#"<a class="btn btn-outline-secondary w-100 mb-2 text-start" href="{}">{}</a>"#,
                url, label
            )
        })
        .collect::<String>();

    let smiles_links = SMILES_LINKS
        .iter()
        .map(|(label, url)| {
            format!(
                r#"<div class="col-md-4"><a class="btn btn-outline-secondary w-100" href="{}"><strong>{}</strong></a></div>"#,
                url, label
            )
        })
        .collect::<String>();

    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Anima</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
    <style>
        body {{ padding: 2rem; background: #f8f9fa; }}
        .container {{ max-width: 960px; }}
        section {{ background: white; border-radius: 8px; padding: 1.5rem; margin-bottom: 1rem; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .result-section {{ margin-top: 1.5rem; }}
        .reading {{ font-size: 1.1rem; }}
        .depiction svg {{ max-width: 100%; height: auto; }}
        p.justify {{ text-align: justify; }}
        figure img {{ max-width: 100%; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Anima</h1>
        <p class="justify">This page is a very simple visual and interactive representation
        of the work done during my PhD. Add your SMILES molecule and press Predict!</p>

        <section id="pred">
            <h3>Predictions</h3>
            <p>Add your SMILES and press <strong>'Predict!'</strong></p>
            <p>Some suggestions:</p>
            <ul>{suggestions}</ul>
            <p>The max SMILES length is {max_len} elements.</p>
            <form method="POST" action="/predict" class="row g-2 align-items-end">
                <div class="col-md-8">
                    <label class="form-label" for="smiles"><strong>SMILES</strong></label>
                    <input type="text" class="form-control font-monospace" id="smiles" name="smiles" value="{input}">
                </div>
                <div class="col-md-4">
                    <button type="submit" class="btn btn-primary w-100"><strong>Predict!</strong></button>
                </div>
            </form>
            {result}
        </section>

        <section id="hwork">
            <h3>How does it work?</h3>
            <p class="justify">The NLP Neural Network first breaks the SMILES into smaller pieces (tokens).
            These pieces, representing individual atom species, special bonds and others, are uniquely
            identified, so a normal carbon differs from an aromatic carbon. They are then transformed into
            vector embeddings learned during training, processed through a parallel stack of recurrent (GRU)
            and dense layers, concatenated and decoded in a final dense layer.</p>
            <figure>
                <img src="/static/panel_smiles_nn.png" alt="SMILES neural network">
                <figcaption>Schematics of how the NLP-based SMILES Neural Net works. Figure extracted from
                <a href="https://doi.org/10.1016/j.ensm.2021.10.029">this paper</a>.</figcaption>
            </figure>
            <p class="justify">Combined with a simpler linear model, the neural model predicts the redox
            potentials (oxidation and reduction) and the lithium insertion potential for the target molecule.</p>
            <figure>
                <img src="/static/new_scheme.jpg" alt="Prediction workflow">
                <figcaption>Illustrating the final workflow. Figure extracted from
                <a href="https://doi.org/10.1016/j.ensm.2021.10.029">this paper</a>.</figcaption>
            </figure>
        </section>

        <section id="desc">
            <h3>Further details</h3>
            <p class="justify">The idea behind this project was to develop a robust AI-driven methodology
            to boost the discovery of novel organic-based electroactive materials for ion batteries.</p>
            <p class="justify">The work is completely described in the Doctoral Thesis linked below.</p>
            {further_reading}
            <a class="btn btn-primary w-100" href="https://github.com/rpcarvs/anima">Anima repository</a>
        </section>

        <section id="sml">
            <h3>What are SMILES?</h3>
            <p class="justify">Anima inputs must be molecules represented in the SMILES format.
            You can read more and prepare some inputs using the links below.</p>
            <div class="row g-2 mb-3">{smiles_links}</div>
            <p class="justify">The SMILES string representing a given molecule (for example "CCCC=O") can be
            inserted on the designated field. After pressing 'Predict!', the input is checked and adjusted to
            what the framework expects. If successful, the molecule is plotted together with the predictions.</p>
        </section>
    </div>
</body>
</html>
"##,
        suggestions = suggestions,
        max_len = max_smiles_length,
        input = escape_html(input),
        result = render_result(block),
        further_reading = further_reading,
        smiles_links = smiles_links,
    )
}

/// Minimal page for hard faults
pub fn render_error_page(message: &str) -> String {
    format!(
        r##"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Anima - Error</title>
    <link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet">
</head>
<body class="p-4">
    <div class="container">
        <h1>Anima</h1>
        <div class="alert alert-danger">{}</div>
        <a href="/">Back</a>
    </div>
</body>
</html>
"##,
        escape_html(message)
    )
}
